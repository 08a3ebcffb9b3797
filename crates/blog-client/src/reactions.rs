//! Optimistic toggle arithmetic.
//!
//! A `(post, counter)` pair is `Idle` with a local flag and a displayed
//! count. Toggling flips the flag and moves the count one step before the
//! server answers; the count never drops below zero.

use crate::model::ReactionDirection;

/// Flag and displayed count for one counter on one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionState {
    /// Whether this browser has applied the reaction.
    pub active: bool,
    /// Displayed counter value.
    pub count: u64,
}

impl ReactionState {
    /// Request that moves the server from this state to the toggled one.
    pub const fn direction(self) -> ReactionDirection {
        if self.active {
            ReactionDirection::Remove
        } else {
            ReactionDirection::Add
        }
    }

    /// Optimistic guess after toggling.
    ///
    /// # Examples
    /// ```
    /// use blog_client::ReactionState;
    ///
    /// let idle = ReactionState { active: true, count: 0 };
    /// assert_eq!(idle.toggled(), ReactionState { active: false, count: 0 });
    /// ```
    #[must_use]
    pub const fn toggled(self) -> Self {
        let count = match self.direction() {
            ReactionDirection::Add => self.count.saturating_add(1),
            ReactionDirection::Remove => self.count.saturating_sub(1),
        };
        Self {
            active: !self.active,
            count,
        }
    }

    /// State after the server confirmed the toggle with `server_count`.
    #[must_use]
    pub const fn confirmed(self, server_count: u64) -> Self {
        Self {
            active: self.active,
            count: server_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, 0, true, 1, ReactionDirection::Add)]
    #[case(false, 9, true, 10, ReactionDirection::Add)]
    #[case(true, 4, false, 3, ReactionDirection::Remove)]
    #[case(true, 0, false, 0, ReactionDirection::Remove)]
    fn toggles_flag_and_clamps_count(
        #[case] active: bool,
        #[case] count: u64,
        #[case] next_active: bool,
        #[case] next_count: u64,
        #[case] direction: ReactionDirection,
    ) {
        let idle = ReactionState { active, count };

        assert_eq!(idle.direction(), direction);
        assert_eq!(
            idle.toggled(),
            ReactionState {
                active: next_active,
                count: next_count
            }
        );
    }

    #[rstest]
    fn server_count_replaces_the_guess() {
        let pending = ReactionState {
            active: false,
            count: 6,
        }
        .toggled();

        assert_eq!(
            pending.confirmed(12),
            ReactionState {
                active: true,
                count: 12
            }
        );
    }
}
