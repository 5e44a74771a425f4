use super::Category;
use crate::error::Error;
use crate::kernel::CategoryWeight;

/// Ordered sequence of categories, bounded by `max_categories`. Dimension is
/// uniform across all stored weights for the lifetime of the store; that
/// invariant is established by the first allocation and checked (via
/// `debug_assert!`, a programmer invariant rather than a caller error) on
/// every subsequent one.
#[derive(Debug, Default)]
pub struct CategoryStore {
    categories: Vec<Category>,
    max_categories: usize,
    next_created_at: u64,
}

impl CategoryStore {
    pub fn new(max_categories: usize) -> Self {
        Self {
            categories: Vec::new(),
            max_categories,
            next_created_at: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.categories.len() >= self.max_categories
    }

    pub fn max_categories(&self) -> usize {
        self.max_categories
    }

    pub fn get(&self, id: usize) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Category> {
        self.categories.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Allocates a new category from `weight`, returning its id.
    pub fn allocate(&mut self, weight: CategoryWeight) -> Result<usize, Error> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                max_categories: self.max_categories,
            });
        }
        if let Some(existing) = self.categories.first() {
            debug_assert_eq!(
                existing.weight.dim(),
                weight.dim(),
                "all categories in a store must share one dimension"
            );
        }
        let id = self.categories.len();
        let created_at = self.next_created_at;
        self.next_created_at += 1;
        self.categories.push(Category::new(id, weight, created_at));
        Ok(id)
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.next_created_at = 0;
    }

    /// Appends an already-constructed `Category` verbatim, without going
    /// through `allocate`'s id assignment. Used only by persistence restore,
    /// where ids, timestamps, and counters come from the snapshot rather
    /// than being freshly minted. The caller is responsible for restoring
    /// categories in id order.
    pub fn restore(&mut self, category: Category) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                max_categories: self.max_categories,
            });
        }
        self.next_created_at = self.next_created_at.max(category.created_at + 1);
        self.categories.push(category);
        Ok(())
    }
}
