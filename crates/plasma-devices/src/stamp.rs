//! Resolved terminals and stamp function signatures.

use plasma_core::{DaeSystem, MnaSystem};

use crate::element::Element;
use crate::error::{Error, Result};

/// An element's terminals and branch slot resolved against a layout.
///
/// `a` and `b` are matrix rows (`None` for ground). `branch` is the slot
/// within the branch block, present only for elements that carry a branch
/// current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Terminals {
    pub a: Option<usize>,
    pub b: Option<usize>,
    pub branch: Option<usize>,
}

impl Terminals {
    /// Terminals of an element without a branch current.
    pub fn new(a: Option<usize>, b: Option<usize>) -> Self {
        Self { a, b, branch: None }
    }

    /// Terminals of an element owning branch slot `branch`.
    pub fn with_branch(a: Option<usize>, b: Option<usize>, branch: usize) -> Self {
        Self {
            a,
            b,
            branch: Some(branch),
        }
    }

    /// The branch slot, or an error naming the element.
    pub(crate) fn branch_for(&self, element: &Element) -> Result<usize> {
        self.branch.ok_or_else(|| Error::MissingBranch {
            name: element.name().to_string(),
        })
    }
}

/// Stamps an element's steady-state contribution into the MNA system.
pub type DcStampFn = fn(&Element, &Terminals, &mut MnaSystem) -> Result<()>;

/// Stamps an element's contribution into the DAE system.
pub type DaeStampFn = fn(&Element, &Terminals, &mut DaeSystem) -> Result<()>;
