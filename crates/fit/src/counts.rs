use std::fmt;

/// Aggregated outcome of one or more tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub right: u32,
    pub wrong: u32,
    pub ignores: u32,
    pub exceptions: u32,
}

impl Counts {
    pub fn tally(&mut self, other: &Counts) {
        self.right += other.right;
        self.wrong += other.wrong;
        self.ignores += other.ignores;
        self.exceptions += other.exceptions;
    }

    pub fn total(&self) -> u32 {
        self.right + self.wrong + self.ignores + self.exceptions
    }

    pub fn is_failure(&self) -> bool {
        self.wrong > 0 || self.exceptions > 0
    }

    /// Summary CSS class, exceptions taking precedence over wrong. Ignored cells never fail.
    pub fn css_class(&self) -> &'static str {
        if self.exceptions > 0 {
            crate::constants::CSS_EXCEPTION
        } else if self.wrong > 0 {
            crate::constants::CSS_WRONG
        } else {
            crate::constants::CSS_RIGHT
        }
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} right, {} wrong, {} ignored, {} exceptions",
            self.right, self.wrong, self.ignores, self.exceptions
        )
    }
}
