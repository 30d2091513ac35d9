use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dictionary::Capability;

/// Generate random password
fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$%^&*";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS keywords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS glosses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            idgloss TEXT NOT NULL,
            annotation_idgloss TEXT,
            sn INTEGER UNIQUE,
            in_web INTEGER DEFAULT 0,
            is_new INTEGER,
            blend TEXT,
            compound TEXT,
            morph TEXT,
            sense INTEGER,
            stem_sn INTEGER,
            dom_handshape TEXT,
            sub_handshape TEXT,
            final_dom_handshape TEXT,
            final_sub_handshape TEXT,
            loc_prim INTEGER,
            final_loc INTEGER,
            initial_palm_orientation TEXT,
            final_palm_orientation TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            gloss_id INTEGER NOT NULL,
            keyword_id INTEGER NOT NULL,
            idx INTEGER NOT NULL,
            FOREIGN KEY (gloss_id) REFERENCES glosses(id) ON DELETE CASCADE,
            FOREIGN KEY (keyword_id) REFERENCES keywords(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS definitions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            gloss_id INTEGER NOT NULL,
            text TEXT NOT NULL,
            role TEXT NOT NULL,
            count INTEGER NOT NULL,
            published INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (gloss_id) REFERENCES glosses(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS relations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_id INTEGER NOT NULL,
            target_id INTEGER NOT NULL,
            role TEXT NOT NULL,
            FOREIGN KEY (source_id) REFERENCES glosses(id) ON DELETE CASCADE,
            FOREIGN KEY (target_id) REFERENCES glosses(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS languages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dialects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            language_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            FOREIGN KEY (language_id) REFERENCES languages(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS regions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            gloss_id INTEGER NOT NULL,
            dialect_id INTEGER NOT NULL,
            frequency TEXT,
            traditional INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (gloss_id) REFERENCES glosses(id) ON DELETE CASCADE,
            FOREIGN KEY (dialect_id) REFERENCES dialects(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gloss_tags (
            gloss_id INTEGER NOT NULL,
            tag TEXT NOT NULL,
            PRIMARY KEY (gloss_id, tag),
            FOREIGN KEY (gloss_id) REFERENCES glosses(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_capabilities (
            user_id TEXT NOT NULL,
            capability TEXT NOT NULL,
            PRIMARY KEY (user_id, capability),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            expires_at INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_keywords_text ON keywords(text)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_translations_keyword ON translations(keyword_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_translations_gloss ON translations(gloss_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_glosses_sn ON glosses(sn)")
        .execute(pool)
        .await?;

    tracing::info!("Database migration completed");

    initialize_default_data(pool).await?;

    Ok(())
}

/// Initialize default data
async fn initialize_default_data(pool: &SqlitePool) -> Result<()> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count == 0 {
        tracing::info!("First startup, initializing default data...");

        let admin_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let admin_password = generate_random_password(16);
        let password_hash = bcrypt::hash(&admin_password, bcrypt::DEFAULT_COST)?;

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, enabled, created_at, updated_at)
             VALUES (?, ?, ?, 1, ?, ?)",
        )
        .bind(&admin_id)
        .bind("admin")
        .bind(&password_hash)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        // Staff capabilities: full gloss search plus unpublished content
        for capability in [
            Capability::SearchGloss,
            Capability::ViewUnpublishedDefs,
            Capability::ViewAdvancedProperties,
        ] {
            sqlx::query("INSERT INTO user_capabilities (user_id, capability) VALUES (?, ?)")
                .bind(&admin_id)
                .bind(capability.as_str())
                .execute(pool)
                .await?;
        }

        tracing::info!("============================================================");
        tracing::info!("Default staff account created:");
        tracing::info!("  Username: admin");
        tracing::info!("  Password: {}", admin_password);
        tracing::info!("WARNING: Please save the password and change it after login!");
        tracing::info!("============================================================");
    }

    Ok(())
}
