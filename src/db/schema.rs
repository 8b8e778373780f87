//! Database schema and migrations.
//!
//! All migrations are applied sequentially when the database is first
//! opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script executed in order. The schema_version
/// table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users table
    r#"
-- Users table for signup/login
CREATE TABLE utilisateurs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    nom         TEXT NOT NULL,
    prenom      TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    mdp         TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_utilisateurs_email ON utilisateurs(email);
"#,
    // v2: read-status lookup table
    r#"
-- Read-status lookup ('non lu' / 'lu'), seeded lazily
CREATE TABLE statuts (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    etat  TEXT NOT NULL UNIQUE
);
"#,
    // v3: messages table
    r#"
-- Messages; statut_id is shared by all recipients of a message
CREATE TABLE messages (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    objet          TEXT,
    corps          TEXT NOT NULL,
    date_envoi     TEXT NOT NULL,
    expediteur_id  INTEGER NOT NULL REFERENCES utilisateurs(id),
    statut_id      INTEGER NOT NULL REFERENCES statuts(id)
);

CREATE INDEX idx_messages_expediteur ON messages(expediteur_id);
CREATE INDEX idx_messages_date_envoi ON messages(date_envoi);
"#,
    // v4: delivery join table
    r#"
-- One row per (message, recipient) pair
CREATE TABLE receptions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    message_id       INTEGER NOT NULL REFERENCES messages(id) ON DELETE CASCADE,
    destinataire_id  INTEGER NOT NULL REFERENCES utilisateurs(id),
    UNIQUE(message_id, destinataire_id)
);

CREATE INDEX idx_receptions_destinataire ON receptions(destinataire_id);
"#,
    // v5: attachment metadata table
    r#"
-- Attachment metadata; bytes live on disk at chemin_de_stockage
CREATE TABLE pieces_jointes (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    nom_fichier         TEXT NOT NULL,
    taille              INTEGER NOT NULL,
    chemin_de_stockage  TEXT NOT NULL,
    message_id          INTEGER NOT NULL REFERENCES messages(id) ON DELETE CASCADE
);

CREATE INDEX idx_pieces_jointes_message ON pieces_jointes(message_id);
"#,
];
