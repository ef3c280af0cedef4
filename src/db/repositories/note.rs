use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::notes;
use crate::models::note::{NewNote, Note, note_timestamp};

pub struct NoteRepository {
    conn: DatabaseConnection,
}

impl NoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Append a note. Never merges with earlier notes for the same domain.
    pub async fn insert(&self, note: NewNote) -> Result<i32> {
        let active = notes::ActiveModel {
            user_id: Set(note.user_id),
            domain: Set(note.domain),
            content: Set(note.content),
            timestamp: Set(note_timestamp()),
            url: Set(note.url),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert note")?;

        Ok(model.id)
    }

    /// All notes of a user, newest first
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Note>> {
        let rows = notes::Entity::find()
            .filter(notes::Column::UserId.eq(user_id))
            .order_by_desc(notes::Column::Timestamp)
            .order_by_desc(notes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list notes")?;

        Ok(rows.into_iter().map(Note::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        notes::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count notes")
    }
}
