use store::TabState;

/// Three-state visual indicator for a tab, in precedence order:
/// Restricted beats Active beats Inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Restricted,
    Active,
    Inactive,
}

impl Indicator {
    pub fn resolve(restricted: bool, state: TabState) -> Self {
        if restricted {
            Self::Restricted
        } else if state.is_active() {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Icon asset pushed to the host's action button.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Restricted => "icons/disabled-32.png",
            Self::Active => "icons/active-32.png",
            Self::Inactive => "icons/default-32.png",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Restricted => "Element inspector cannot run on this page",
            Self::Active => "Element inspector is on",
            Self::Inactive => "Element inspector is off",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_wins_over_everything() {
        let active = TabState {
            border_mode: true,
            inspector_mode: true,
        };
        assert_eq!(Indicator::resolve(true, active), Indicator::Restricted);
    }

    #[test]
    fn either_flag_makes_a_tab_active() {
        let border_only = TabState {
            border_mode: true,
            inspector_mode: false,
        };
        let inspector_only = TabState {
            border_mode: false,
            inspector_mode: true,
        };
        assert_eq!(Indicator::resolve(false, border_only), Indicator::Active);
        assert_eq!(Indicator::resolve(false, inspector_only), Indicator::Active);
        assert_eq!(
            Indicator::resolve(false, TabState::default()),
            Indicator::Inactive
        );
    }
}
