//! Message repository.
//!
//! The message row, its delivery rows and its attachment rows are always
//! written inside a single transaction: either the whole send persists or
//! none of it does.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::types::{NewMessage, ReceivedMessage, SentMessage};
use crate::attachment::{Attachment, NewAttachment};
use crate::db::Correspondent;
use crate::Result;

/// Repository for message operations.
pub struct MessageRepository;

impl MessageRepository {
    /// Create a message together with one delivery row per recipient and
    /// one attachment row per stored file, atomically.
    ///
    /// Returns the new message ID.
    pub async fn create(
        pool: &SqlitePool,
        message: &NewMessage,
        destinataire_ids: &[i64],
        attachments: &[NewAttachment],
    ) -> Result<i64> {
        let mut tx = pool.begin().await?;

        let message_id = sqlx::query(
            "INSERT INTO messages (objet, corps, date_envoi, expediteur_id, statut_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.objet)
        .bind(&message.corps)
        .bind(message.date_envoi.to_rfc3339())
        .bind(message.expediteur_id)
        .bind(message.statut_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for destinataire_id in destinataire_ids {
            sqlx::query("INSERT INTO receptions (message_id, destinataire_id) VALUES (?, ?)")
                .bind(message_id)
                .bind(destinataire_id)
                .execute(&mut *tx)
                .await?;
        }

        for attachment in attachments {
            sqlx::query(
                "INSERT INTO pieces_jointes (nom_fichier, taille, chemin_de_stockage, message_id)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&attachment.nom_fichier)
            .bind(attachment.taille)
            .bind(&attachment.chemin_de_stockage)
            .bind(message_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(message_id)
    }

    /// Check whether a message exists.
    pub async fn exists(pool: &SqlitePool, message_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM messages WHERE id = ?)")
                .bind(message_id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Check whether a delivery row exists for (message, recipient).
    pub async fn is_recipient(pool: &SqlitePool, message_id: i64, user_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM receptions WHERE message_id = ? AND destinataire_id = ?)",
        )
        .bind(message_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Update the read-status of a message.
    ///
    /// Returns false if the message does not exist.
    pub async fn set_status(pool: &SqlitePool, message_id: i64, statut_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE messages SET statut_id = ? WHERE id = ?")
            .bind(statut_id)
            .bind(message_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get one sent message with its recipients and attachments resolved.
    pub async fn get_sent_by_id(pool: &SqlitePool, message_id: i64) -> Result<Option<SentMessage>> {
        let row = sqlx::query(
            "SELECT id, objet, corps, date_envoi FROM messages WHERE id = ?",
        )
        .bind(message_id)
        .fetch_optional(pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let destinataires = Self::recipients_of(pool, message_id).await?;
        let pieces_jointes = Self::attachments_of(pool, message_id).await?;

        Ok(Some(SentMessage {
            id: row.get(0),
            objet: row.get(1),
            corps: row.get(2),
            date_envoi: parse_date(&row.get::<String, _>(3)),
            destinataires,
            pieces_jointes,
        }))
    }

    /// List messages received by a user, most recent first.
    pub async fn list_received(pool: &SqlitePool, user_id: i64) -> Result<Vec<ReceivedMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.objet, m.corps, m.date_envoi, s.etat,
                   u.id, u.nom, u.prenom, u.email
            FROM receptions r
            JOIN messages m ON m.id = r.message_id
            JOIN utilisateurs u ON u.id = m.expediteur_id
            JOIN statuts s ON s.id = m.statut_id
            WHERE r.destinataire_id = ?
            ORDER BY m.date_envoi DESC, m.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let message_id: i64 = row.get(0);
            let pieces_jointes = Self::attachments_of(pool, message_id).await?;

            messages.push(ReceivedMessage {
                id: message_id,
                objet: row.get(1),
                corps: row.get(2),
                date_envoi: parse_date(&row.get::<String, _>(3)),
                statut: row.get(4),
                expediteur: Correspondent {
                    id: row.get(5),
                    nom: row.get(6),
                    prenom: row.get(7),
                    email: row.get(8),
                },
                pieces_jointes,
            });
        }

        Ok(messages)
    }

    /// List messages sent by a user, most recent first.
    pub async fn list_sent(pool: &SqlitePool, user_id: i64) -> Result<Vec<SentMessage>> {
        let rows = sqlx::query(
            "SELECT id, objet, corps, date_envoi FROM messages
             WHERE expediteur_id = ?
             ORDER BY date_envoi DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let message_id: i64 = row.get(0);
            let destinataires = Self::recipients_of(pool, message_id).await?;
            let pieces_jointes = Self::attachments_of(pool, message_id).await?;

            messages.push(SentMessage {
                id: message_id,
                objet: row.get(1),
                corps: row.get(2),
                date_envoi: parse_date(&row.get::<String, _>(3)),
                destinataires,
                pieces_jointes,
            });
        }

        Ok(messages)
    }

    /// Recipients of a message, in delivery order.
    async fn recipients_of(pool: &SqlitePool, message_id: i64) -> Result<Vec<Correspondent>> {
        let destinataires = sqlx::query_as::<_, Correspondent>(
            "SELECT u.id, u.nom, u.prenom, u.email
             FROM receptions r
             JOIN utilisateurs u ON u.id = r.destinataire_id
             WHERE r.message_id = ?
             ORDER BY r.id",
        )
        .bind(message_id)
        .fetch_all(pool)
        .await?;
        Ok(destinataires)
    }

    /// Attachments of a message.
    async fn attachments_of(pool: &SqlitePool, message_id: i64) -> Result<Vec<Attachment>> {
        let pieces_jointes = sqlx::query_as::<_, Attachment>(
            "SELECT id, nom_fichier, taille, chemin_de_stockage, message_id
             FROM pieces_jointes WHERE message_id = ? ORDER BY id",
        )
        .bind(message_id)
        .fetch_all(pool)
        .await?;
        Ok(pieces_jointes)
    }
}

/// Parse a stored RFC 3339 timestamp, falling back to now on corrupt data.
fn parse_date(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewUser, UserRepository};
    use crate::status::{StatusCatalog, ETAT_NON_LU};

    async fn setup() -> (Database, i64, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let alice = repo
            .create(&NewUser::new("Alice", "A", "alice@x.com", "h"))
            .await
            .unwrap()
            .id;
        let bob = repo
            .create(&NewUser::new("Bob", "B", "bob@x.com", "h"))
            .await
            .unwrap()
            .id;
        StatusCatalog::ensure_seeded(db.pool()).await.unwrap();
        let non_lu = StatusCatalog::lookup(db.pool(), ETAT_NON_LU).await.unwrap();
        (db, alice, bob, non_lu)
    }

    fn new_message(expediteur_id: i64, statut_id: i64, corps: &str) -> NewMessage {
        NewMessage {
            objet: Some("Sujet".to_string()),
            corps: corps.to_string(),
            date_envoi: Utc::now(),
            expediteur_id,
            statut_id,
        }
    }

    #[tokio::test]
    async fn test_create_with_deliveries_and_attachments() {
        let (db, alice, bob, non_lu) = setup().await;

        let id = MessageRepository::create(
            db.pool(),
            &new_message(alice, non_lu, "Bonjour"),
            &[bob],
            &[NewAttachment::new("a.pdf", 3, "uploads/1-a.pdf")],
        )
        .await
        .unwrap();

        let sent = MessageRepository::get_sent_by_id(db.pool(), id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sent.corps, "Bonjour");
        assert_eq!(sent.destinataires.len(), 1);
        assert_eq!(sent.destinataires[0].email, "bob@x.com");
        assert_eq!(sent.pieces_jointes.len(), 1);
        assert_eq!(sent.pieces_jointes[0].nom_fichier, "a.pdf");
    }

    #[tokio::test]
    async fn test_create_rolls_back_on_bad_recipient() {
        let (db, alice, _bob, non_lu) = setup().await;

        // Recipient id 999 violates the foreign key; nothing may persist
        let result = MessageRepository::create(
            db.pool(),
            &new_message(alice, non_lu, "Bonjour"),
            &[999],
            &[],
        )
        .await;
        assert!(result.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_is_recipient() {
        let (db, alice, bob, non_lu) = setup().await;

        let id = MessageRepository::create(
            db.pool(),
            &new_message(alice, non_lu, "Bonjour"),
            &[bob],
            &[],
        )
        .await
        .unwrap();

        assert!(MessageRepository::is_recipient(db.pool(), id, bob)
            .await
            .unwrap());
        // The sender is not a recipient
        assert!(!MessageRepository::is_recipient(db.pool(), id, alice)
            .await
            .unwrap());
        assert!(!MessageRepository::is_recipient(db.pool(), 999, bob)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_set_status() {
        let (db, alice, bob, non_lu) = setup().await;
        let lu = StatusCatalog::lookup(db.pool(), crate::status::ETAT_LU)
            .await
            .unwrap();

        let id = MessageRepository::create(
            db.pool(),
            &new_message(alice, non_lu, "Bonjour"),
            &[bob],
            &[],
        )
        .await
        .unwrap();

        assert!(MessageRepository::set_status(db.pool(), id, lu).await.unwrap());

        let received = MessageRepository::list_received(db.pool(), bob).await.unwrap();
        assert_eq!(received[0].statut, "lu");

        assert!(!MessageRepository::set_status(db.pool(), 999, lu).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_received_order_and_isolation() {
        let (db, alice, bob, non_lu) = setup().await;

        for i in 1..=3 {
            MessageRepository::create(
                db.pool(),
                &NewMessage {
                    objet: None,
                    corps: format!("Message {i}"),
                    date_envoi: Utc::now() + chrono::Duration::seconds(i),
                    expediteur_id: alice,
                    statut_id: non_lu,
                },
                &[bob],
                &[],
            )
            .await
            .unwrap();
        }

        let received = MessageRepository::list_received(db.pool(), bob).await.unwrap();
        assert_eq!(received.len(), 3);
        // Most recent first
        assert_eq!(received[0].corps, "Message 3");
        assert_eq!(received[2].corps, "Message 1");
        assert_eq!(received[0].expediteur.email, "alice@x.com");
        assert_eq!(received[0].statut, "non lu");

        // Alice received nothing
        assert!(MessageRepository::list_received(db.pool(), alice)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_sent() {
        let (db, alice, bob, non_lu) = setup().await;

        MessageRepository::create(
            db.pool(),
            &new_message(alice, non_lu, "Bonjour"),
            &[bob],
            &[],
        )
        .await
        .unwrap();

        let sent = MessageRepository::list_sent(db.pool(), alice).await.unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destinataires.len(), 1);
        assert_eq!(sent[0].destinataires[0].email, "bob@x.com");

        assert!(MessageRepository::list_sent(db.pool(), bob)
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_date_round_trip() {
        let now = Utc::now();
        let parsed = parse_date(&now.to_rfc3339());
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }
}
