//! Named countdown timers for the single execution context.
//!
//! The state machine never hands out closures; it arms a timer by
//! [`TimerTag`] and the service loop asks the set which tag is due next.
//!
//! ```text
//!   service loop ──▶ TimerSet::take_due(now) ──▶ Firing { tag, owner }
//!                                                     │
//!           ButtonPoll ◀────────── tag ───────────────┤
//!           FilterStateMachine::on_timer ◀────────────┘
//! ```
//!
//! ## Ordering
//!
//! Among timers due at or before `now`, the earliest deadline fires first.
//! Equal deadlines fire in tag order:
//!
//! | Order | Tag              | Owner            |
//! |-------|------------------|------------------|
//! | 0     | `LongPressCheck` | Idle             |
//! | 1     | `Completion`     | Blinking         |
//! | 2     | `Blink`          | Blinking/Training|
//! | 3     | `Idle`           | Idle             |
//! | 4     | `ButtonPoll`     | none             |
//!
//! A periodic timer that has fallen behind (the context was blocked) fires
//! once and then skips to the next period boundary after `now`; firings
//! are never queued.

use crate::fsm::FilterState;
use log::debug;

// ═══════════════════════════════════════════════════════════════
//  Timer identity
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TimerTag {
    LongPressCheck = 0,
    Completion = 1,
    Blink = 2,
    Idle = 3,
    ButtonPoll = 4,
}

impl TimerTag {
    pub const COUNT: usize = 5;

    /// Every tag, in firing order for equal deadlines.
    pub const ALL: [TimerTag; Self::COUNT] = [
        Self::LongPressCheck,
        Self::Completion,
        Self::Blink,
        Self::Idle,
        Self::ButtonPoll,
    ];

    /// Timers cleared by "cancel everything except idle".
    pub const SCOPED: [TimerTag; 3] = [Self::LongPressCheck, Self::Completion, Self::Blink];

    pub fn name(self) -> &'static str {
        match self {
            Self::LongPressCheck => "long_press",
            Self::Completion => "completion",
            Self::Blink => "blink",
            Self::Idle => "idle",
            Self::ButtonPoll => "button_poll",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Periodic,
    OneShot,
}

// ═══════════════════════════════════════════════════════════════
//  Handles
// ═══════════════════════════════════════════════════════════════

/// Bookkeeping for one tag.  A disarmed handle keeps its last period and
/// mode so tests can inspect what was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub period_ms: u32,
    pub mode: TimerMode,
    pub armed: bool,
    pub due_at_ms: u64,
    /// State the timer was armed for; `None` for context-level timers.
    pub owner: Option<FilterState>,
}

impl TimerHandle {
    const DISARMED: Self = Self {
        period_ms: 0,
        mode: TimerMode::OneShot,
        armed: false,
        due_at_ms: 0,
        owner: None,
    };
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub tag: TimerTag,
    pub owner: Option<FilterState>,
    pub due_at_ms: u64,
}

// ═══════════════════════════════════════════════════════════════
//  Timer set
// ═══════════════════════════════════════════════════════════════

pub struct TimerSet {
    handles: [TimerHandle; TimerTag::COUNT],
}

impl TimerSet {
    pub fn new() -> Self {
        Self {
            handles: [TimerHandle::DISARMED; TimerTag::COUNT],
        }
    }

    /// Arm (or rearm) `tag`.  The first firing is one period after `now_ms`.
    pub fn arm(
        &mut self,
        tag: TimerTag,
        period_ms: u32,
        mode: TimerMode,
        now_ms: u64,
        owner: Option<FilterState>,
    ) {
        debug!(
            "timer: arm {} {:?} {}ms owner={:?}",
            tag.name(),
            mode,
            period_ms,
            owner
        );
        self.handles[tag as usize] = TimerHandle {
            period_ms,
            mode,
            armed: true,
            due_at_ms: now_ms + u64::from(period_ms),
            owner,
        };
    }

    /// Disarm `tag`.  Cancelling a disarmed timer is a no-op.
    pub fn cancel(&mut self, tag: TimerTag) {
        let h = &mut self.handles[tag as usize];
        if h.armed {
            debug!("timer: cancel {}", tag.name());
        }
        h.armed = false;
    }

    /// Cancel every state-scoped timer, leaving the idle timer and the
    /// button poll alone.
    pub fn cancel_scoped(&mut self) {
        for tag in TimerTag::SCOPED {
            self.cancel(tag);
        }
    }

    pub fn is_armed(&self, tag: TimerTag) -> bool {
        self.handles[tag as usize].armed
    }

    pub fn handle(&self, tag: TimerTag) -> &TimerHandle {
        &self.handles[tag as usize]
    }

    pub fn period_ms(&self, tag: TimerTag) -> u32 {
        self.handles[tag as usize].period_ms
    }

    pub fn mode(&self, tag: TimerTag) -> TimerMode {
        self.handles[tag as usize].mode
    }

    pub fn armed_tags(&self) -> impl Iterator<Item = TimerTag> + '_ {
        TimerTag::ALL.into_iter().filter(|&t| self.is_armed(t))
    }

    /// Earliest armed deadline, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.handles
            .iter()
            .filter(|h| h.armed)
            .map(|h| h.due_at_ms)
            .min()
    }

    /// True when every armed state-owned timer belongs to `state`.
    pub fn owned_by(&self, state: FilterState) -> bool {
        self.handles
            .iter()
            .filter(|h| h.armed)
            .all(|h| h.owner.is_none_or(|o| o == state))
    }

    /// Pop the next due timer at `now_ms`, rescheduling or disarming it.
    pub fn take_due(&mut self, now_ms: u64) -> Option<Firing> {
        let mut pick: Option<TimerTag> = None;
        for tag in TimerTag::ALL {
            let h = &self.handles[tag as usize];
            if !h.armed || h.due_at_ms > now_ms {
                continue;
            }
            match pick {
                Some(p) if self.handles[p as usize].due_at_ms <= h.due_at_ms => {}
                _ => pick = Some(tag),
            }
        }

        let tag = pick?;
        let h = &mut self.handles[tag as usize];
        let firing = Firing {
            tag,
            owner: h.owner,
            due_at_ms: h.due_at_ms,
        };
        match h.mode {
            TimerMode::OneShot => h.armed = false,
            TimerMode::Periodic => {
                let period = u64::from(h.period_ms.max(1));
                let behind = (now_ms - h.due_at_ms) / period;
                h.due_at_ms += period * (behind + 1);
            }
        }
        Some(firing)
    }
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
