//! Body category tags
//!
//! Every physical body carries exactly one tag. Tags are disjoint bits so they
//! can be OR-ed into contact-interest masks. The bit values are a
//! compatibility contract with engine bindings and must not change.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Role of a physical body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Ball,
    Bottom,
    Brick,
    Paddle,
    Border,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Ball,
        Category::Bottom,
        Category::Brick,
        Category::Paddle,
        Category::Border,
    ];

    /// Bit value of this tag
    pub const fn bits(self) -> u32 {
        match self {
            Category::Ball => 1 << 0,
            Category::Bottom => 1 << 1,
            Category::Brick => 1 << 2,
            Category::Paddle => 1 << 3,
            Category::Border => 1 << 4,
        }
    }

    /// Recover a tag from raw engine bits. Anything that is not exactly one
    /// known tag yields `None`.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.bits() == bits)
    }
}

/// Set of categories, used for contact-interest masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct CategoryMask(u32);

impl CategoryMask {
    pub const NONE: CategoryMask = CategoryMask(0);
    pub const ALL: CategoryMask = CategoryMask(u32::MAX);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bits() != 0
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        CategoryMask(category.bits())
    }
}

impl BitOr for Category {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> CategoryMask {
        CategoryMask(self.bits() | rhs.bits())
    }
}

impl BitOr<Category> for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> CategoryMask {
        CategoryMask(self.0 | rhs.bits())
    }
}

impl BitOr for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: CategoryMask) -> CategoryMask {
        CategoryMask(self.0 | rhs.0)
    }
}
