// SPDX-License-Identifier: Apache-2.0

use crate::{conv_err, ts_from_sql, ts_to_sql, Store, StoreError};
use motus_model::{Audience, AudienceRewrite, MovementAssessmentId, RewriteId};
use rusqlite::{params, Row};

fn row_to_rewrite(row: &Row<'_>) -> rusqlite::Result<AudienceRewrite> {
    let id: String = row.get("id")?;
    let assessment_id: Option<String> = row.get("movement_assessment_id")?;
    let audience: String = row.get("audience")?;
    let created_at: String = row.get("created_at")?;
    let movement_assessment_id = assessment_id
        .map(|raw| MovementAssessmentId::parse(&raw))
        .transpose()
        .map_err(conv_err)?;
    Ok(AudienceRewrite {
        id: RewriteId::parse(&id).map_err(conv_err)?,
        movement_assessment_id,
        audience: Audience::parse(&audience).map_err(conv_err)?,
        tone: row.get("tone")?,
        source_text: row.get("source_text")?,
        rewritten_text: row.get("rewritten_text")?,
        created_at: ts_from_sql(&created_at).map_err(conv_err)?,
    })
}

impl Store {
    pub fn insert_rewrite(&self, rewrite: &AudienceRewrite) -> Result<(), StoreError> {
        self.conn().execute(
            "INSERT INTO audience_rewrites
                 (id, movement_assessment_id, audience, tone, source_text, rewritten_text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                rewrite.id.as_str(),
                rewrite.movement_assessment_id.as_ref().map(|id| id.as_str()),
                rewrite.audience.as_str(),
                rewrite.tone,
                rewrite.source_text,
                rewrite.rewritten_text,
                ts_to_sql(&rewrite.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_rewrite(&self, id: &RewriteId) -> Result<AudienceRewrite, StoreError> {
        let mut stmt = self
            .conn()
            .prepare("SELECT * FROM audience_rewrites WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id.as_str()], row_to_rewrite)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::not_found("audience_rewrite", id.as_str())),
        }
    }
}
