// SPDX-License-Identifier: Apache-2.0

use crate::{conv_err, ts_from_sql, ts_to_sql, Store, StoreError};
use chrono::{NaiveDate, Utc};
use motus_model::{Athlete, AthleteContact, AthleteId, ContactId, Sex};
use rusqlite::{params, Row};

fn row_to_athlete(row: &Row<'_>) -> rusqlite::Result<Athlete> {
    let id: String = row.get("id")?;
    let sex: String = row.get("sex")?;
    let dob: String = row.get("date_of_birth")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(Athlete {
        id: AthleteId::parse(&id).map_err(conv_err)?,
        name: row.get("name")?,
        sport: row.get("sport")?,
        position: row.get("position")?,
        team: row.get("team")?,
        sex: Sex::parse(&sex).map_err(conv_err)?,
        date_of_birth: NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(conv_err)?,
        height_cm: row.get("height_cm")?,
        weight_kg: row.get("weight_kg")?,
        notes: row.get("notes")?,
        archived: row.get::<_, i64>("archived")? != 0,
        created_at: ts_from_sql(&created_at).map_err(conv_err)?,
        updated_at: ts_from_sql(&updated_at).map_err(conv_err)?,
    })
}

fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<AthleteContact> {
    let id: String = row.get("id")?;
    let athlete_id: String = row.get("athlete_id")?;
    Ok(AthleteContact {
        id: ContactId::parse(&id).map_err(conv_err)?,
        athlete_id: AthleteId::parse(&athlete_id).map_err(conv_err)?,
        name: row.get("name")?,
        relationship: row.get("relationship")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        role: row.get("role")?,
    })
}

impl Store {
    pub fn insert_athlete(&self, athlete: &Athlete) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO athletes (id, name, sport, position, team, sex, date_of_birth,
                                   height_cm, weight_kg, notes, archived, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                athlete.id.as_str(),
                athlete.name,
                athlete.sport,
                athlete.position,
                athlete.team,
                athlete.sex.as_str(),
                athlete.date_of_birth.format("%Y-%m-%d").to_string(),
                athlete.height_cm,
                athlete.weight_kg,
                athlete.notes,
                athlete.archived as i64,
                ts_to_sql(&athlete.created_at),
                ts_to_sql(&athlete.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_athlete(&self, id: &AthleteId) -> Result<Athlete, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM athletes WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], row_to_athlete)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("athlete", id.as_str())),
        }
    }

    /// Most recently registered first; optional exact team filter.
    pub fn list_athletes(
        &self,
        limit: usize,
        team: Option<&str>,
    ) -> Result<Vec<Athlete>, StoreError> {
        let mut sql = "SELECT * FROM athletes".to_string();
        let mut bind: Vec<rusqlite::types::Value> = Vec::new();
        if let Some(team) = team {
            sql.push_str(" WHERE team = ?1");
            bind.push(rusqlite::types::Value::Text(team.to_string()));
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ?{}",
            bind.len() + 1
        ));
        bind.push(rusqlite::types::Value::Integer(limit as i64));
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bind), row_to_athlete)?;
        let mut athletes = Vec::new();
        for row in rows {
            athletes.push(row?);
        }
        Ok(athletes)
    }

    /// Full-row update; callers merge partial edits before calling.
    pub fn update_athlete(&self, athlete: &Athlete) -> Result<(), StoreError> {
        let changed = self.conn().execute(
            "UPDATE athletes SET name = ?2, sport = ?3, position = ?4, team = ?5, sex = ?6,
                    date_of_birth = ?7, height_cm = ?8, weight_kg = ?9, notes = ?10,
                    archived = ?11, updated_at = ?12
             WHERE id = ?1",
            params![
                athlete.id.as_str(),
                athlete.name,
                athlete.sport,
                athlete.position,
                athlete.team,
                athlete.sex.as_str(),
                athlete.date_of_birth.format("%Y-%m-%d").to_string(),
                athlete.height_cm,
                athlete.weight_kg,
                athlete.notes,
                athlete.archived as i64,
                ts_to_sql(&athlete.updated_at),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("athlete", athlete.id.as_str()));
        }
        Ok(())
    }

    /// Soft lifecycle: athletes are archived, never deleted.
    pub fn archive_athlete(&self, id: &AthleteId) -> Result<Athlete, StoreError> {
        let changed = self.conn().execute(
            "UPDATE athletes SET archived = 1, updated_at = ?2 WHERE id = ?1",
            params![id.as_str(), ts_to_sql(&Utc::now())],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("athlete", id.as_str()));
        }
        self.get_athlete(id)
    }

    pub fn insert_contact(&self, contact: &AthleteContact) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO athlete_contacts (id, athlete_id, name, relationship, email, phone, role)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                contact.id.as_str(),
                contact.athlete_id.as_str(),
                contact.name,
                contact.relationship,
                contact.email,
                contact.phone,
                contact.role,
            ],
        )?;
        Ok(())
    }

    pub fn list_contacts(&self, athlete_id: &AthleteId) -> Result<Vec<AthleteContact>, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM athlete_contacts WHERE athlete_id = ?1 ORDER BY name")?;
        let rows = stmt.query_map(params![athlete_id.as_str()], row_to_contact)?;
        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row?);
        }
        Ok(contacts)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn fixture_athlete(name: &str) -> Athlete {
        let now = Utc::now();
        Athlete {
            id: AthleteId::generate(),
            name: name.to_string(),
            sport: "soccer".to_string(),
            position: Some("midfield".to_string()),
            team: Some("U16A".to_string()),
            sex: Sex::Female,
            date_of_birth: NaiveDate::from_ymd_opt(2009, 4, 2).expect("date"),
            height_cm: Some(164.0),
            weight_kg: Some(55.5),
            notes: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn athlete_round_trip_and_archive() {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("Ada Imoh");
        store.insert_athlete(&athlete).expect("insert");

        let loaded = store.get_athlete(&athlete.id).expect("get");
        assert_eq!(loaded.name, "Ada Imoh");
        assert_eq!(loaded.date_of_birth, athlete.date_of_birth);
        assert!(!loaded.archived);

        let archived = store.archive_athlete(&athlete.id).expect("archive");
        assert!(archived.archived);
    }

    #[test]
    fn missing_athlete_is_not_found() {
        let store = Store::open_in_memory().expect("open");
        let err = store.get_athlete(&AthleteId::generate()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn list_respects_team_filter_and_limit() {
        let store = Store::open_in_memory().expect("open");
        for i in 0..4 {
            let mut athlete = fixture_athlete(&format!("Athlete {i}"));
            if i == 3 {
                athlete.team = Some("U18B".to_string());
            }
            store.insert_athlete(&athlete).expect("insert");
        }
        assert_eq!(store.list_athletes(10, None).expect("list").len(), 4);
        assert_eq!(store.list_athletes(2, None).expect("list").len(), 2);
        assert_eq!(
            store.list_athletes(10, Some("U18B")).expect("list").len(),
            1
        );
    }

    #[test]
    fn contact_requires_existing_athlete() {
        let store = Store::open_in_memory().expect("open");
        let contact = AthleteContact {
            id: ContactId::generate(),
            athlete_id: AthleteId::generate(),
            name: "Guardian".to_string(),
            relationship: "parent".to_string(),
            email: None,
            phone: None,
            role: None,
        };
        assert!(matches!(
            store.insert_contact(&contact),
            Err(StoreError::Sqlite(_))
        ));
    }

    #[test]
    fn contacts_attach_to_their_athlete() {
        let store = Store::open_in_memory().expect("open");
        let athlete = fixture_athlete("Has Contacts");
        store.insert_athlete(&athlete).expect("insert athlete");
        let contact = AthleteContact {
            id: ContactId::generate(),
            athlete_id: athlete.id.clone(),
            name: "Guardian".to_string(),
            relationship: "parent".to_string(),
            email: Some("g@example.com".to_string()),
            phone: None,
            role: Some("emergency".to_string()),
        };
        store.insert_contact(&contact).expect("insert contact");
        let contacts = store.list_contacts(&athlete.id).expect("list");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0], contact);
    }
}
