//! SQL schema for the Birthday Meet SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps row ids from being reused after a delete, so ordering
/// by id is always ordering by insertion.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT    NOT NULL UNIQUE,
    password_hash TEXT    NOT NULL,    -- argon2 PHC string
    month         INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    day           INTEGER NOT NULL CHECK (day BETWEEN 1 AND 31)
);

-- Rows are deleted once the receiver accepts or ignores them.
CREATE TABLE IF NOT EXISTS requests (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id       INTEGER NOT NULL REFERENCES users(id),
    receiver_id     INTEGER NOT NULL REFERENCES users(id),
    request_message TEXT    NOT NULL,
    when_sent       TEXT    NOT NULL,  -- YYYY-MM-DD
    UNIQUE (sender_id, receiver_id),
    CHECK  (sender_id != receiver_id)
);

-- One row per unordered pair, lower id first.
CREATE TABLE IF NOT EXISTS friends (
    user_1_id INTEGER NOT NULL REFERENCES users(id),
    user_2_id INTEGER NOT NULL REFERENCES users(id),
    PRIMARY KEY (user_1_id, user_2_id),
    CHECK (user_1_id < user_2_id)
);

CREATE TABLE IF NOT EXISTS messages (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id    INTEGER NOT NULL REFERENCES users(id),
    receiver_id  INTEGER NOT NULL REFERENCES users(id),
    message_text TEXT    NOT NULL,
    when_sent    TEXT    NOT NULL,     -- YYYY-MM-DD
    is_read      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS users_birthday_idx     ON users(month, day);
CREATE INDEX IF NOT EXISTS requests_receiver_idx  ON requests(receiver_id);
CREATE INDEX IF NOT EXISTS friends_user_2_idx     ON friends(user_2_id);
CREATE INDEX IF NOT EXISTS messages_receiver_idx  ON messages(receiver_id);
CREATE INDEX IF NOT EXISTS messages_sender_idx    ON messages(sender_id);

PRAGMA user_version = 1;
";
