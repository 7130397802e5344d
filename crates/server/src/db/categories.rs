use chrono::Utc;
use fruit_porter_core::CategoryId;

use crate::models::Category;
use crate::store::query::{Predicate, Query};
use crate::store::Database;

#[derive(Debug)]
pub struct NewCategory {
    pub name: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

pub struct CategoryRepository<'a> {
    db: &'a mut Database,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn insert(&mut self, new_category: NewCategory) -> CategoryId {
        let id = self.db.issue_category_id();
        self.db.categories.push(Category {
            id,
            name: new_category.name,
            icon: new_category.icon,
            sort_order: new_category.sort_order,
            created_at: Utc::now(),
        });
        id
    }

    pub fn find_by_id(&self, id: CategoryId) -> Option<Category> {
        Query::new()
            .filter(Predicate::IdEq(id.as_i32()))
            .run_one(&self.db.categories)
    }

    /// All categories in display order.
    pub fn all(&self) -> Vec<Category> {
        let mut categories = Query::new().run(&self.db.categories);
        categories.sort_by_key(|c| c.sort_order);
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_by_display_position() {
        let mut db = Database::empty();
        let mut repo = CategoryRepository::new(&mut db);
        repo.insert(NewCategory {
            name: "Second".to_owned(),
            icon: None,
            sort_order: 2,
        });
        repo.insert(NewCategory {
            name: "First".to_owned(),
            icon: None,
            sort_order: 1,
        });
        let names: Vec<_> = repo.all().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
