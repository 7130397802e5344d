use chrono::Utc;
use fruit_porter_core::{FavoriteId, ProductId, UserId};

use crate::models::Favorite;
use crate::store::query::{Predicate, Query};
use crate::store::views::{project_favorites, FavoriteView};
use crate::store::Database;

#[derive(Debug)]
pub struct NewFavorite {
    pub user_id: UserId,
    pub product_id: ProductId,
}

pub struct FavoriteRepository<'a> {
    db: &'a mut Database,
}

impl<'a> FavoriteRepository<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub fn insert(&mut self, new_favorite: NewFavorite) -> FavoriteId {
        let id = self.db.issue_favorite_id();
        self.db.favorites.push(Favorite {
            id,
            user_id: new_favorite.user_id,
            product_id: new_favorite.product_id,
            created_at: Utc::now(),
        });
        id
    }

    pub fn list_for_user(&self, user_id: UserId) -> Vec<FavoriteView> {
        Query::new()
            .filter(Predicate::UserEq(user_id))
            .newest_first()
            .run(&project_favorites(self.db))
    }

    pub fn find_pair(&self, user_id: UserId, product_id: ProductId) -> Option<Favorite> {
        Query::new()
            .filter(Predicate::UserEq(user_id))
            .filter(Predicate::ProductEq(product_id))
            .run_one(&self.db.favorites)
    }

    /// Removes the favorite for a `(user, product)` pair.
    pub fn delete_pair(&mut self, user_id: UserId, product_id: ProductId) -> usize {
        let before = self.db.favorites.len();
        self.db
            .favorites
            .retain(|f| !(f.user_id == user_id && f.product_id == product_id));
        before - self.db.favorites.len()
    }
}
