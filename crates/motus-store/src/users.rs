// SPDX-License-Identifier: Apache-2.0

use crate::{conv_err, map_constraint, ts_from_sql, ts_to_sql, Store, StoreError};
use motus_model::{AthleteId, User, UserId};
use rusqlite::{params, Row};

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get("id")?;
    let athlete_id: Option<String> = row.get("athlete_id")?;
    let created_at: String = row.get("created_at")?;
    let athlete_id = athlete_id
        .map(|raw| AthleteId::parse(&raw))
        .transpose()
        .map_err(conv_err)?;
    Ok(User {
        id: UserId::parse(&id).map_err(conv_err)?,
        email: row.get("email")?,
        name: row.get("name")?,
        role: row.get("role")?,
        athlete_id,
        created_at: ts_from_sql(&created_at).map_err(conv_err)?,
    })
}

impl Store {
    pub fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT INTO users (id, email, name, role, athlete_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.as_str(),
                    user.email,
                    user.name,
                    user.role,
                    user.athlete_id.as_ref().map(|id| id.as_str()),
                    ts_to_sql(&user.created_at),
                ],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    pub fn get_user(&self, id: &UserId) -> Result<User, StoreError> {
        let mut stmt = self.conn().prepare("SELECT * FROM users WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], row_to_user)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("user", id.as_str())),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM users WHERE email = ?1")?;
        let mut rows = stmt.query_map(params![email], row_to_user)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("user", email)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::athletes::tests::fixture_athlete;
    use chrono::Utc;

    #[test]
    fn user_links_to_athlete_and_email_is_unique() {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("Linked");
        store.insert_athlete(&athlete).expect("insert athlete");

        let user = User {
            id: UserId::generate(),
            email: "coach@example.com".to_string(),
            name: "Coach".to_string(),
            role: "coach".to_string(),
            athlete_id: Some(athlete.id.clone()),
            created_at: Utc::now(),
        };
        store.insert_user(&user).expect("insert user");
        assert_eq!(store.get_user_by_email("coach@example.com").unwrap(), user);

        let duplicate = User {
            id: UserId::generate(),
            ..user.clone()
        };
        assert!(matches!(
            store.insert_user(&duplicate),
            Err(StoreError::Constraint(_))
        ));
    }
}
