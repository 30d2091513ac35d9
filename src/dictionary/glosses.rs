//! Gloss lookup and the supporting pieces of the gloss detail page:
//! grouped definitions and typed relations.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{Definition, Gloss, RelationRole, GLOSS_COLUMNS};

use super::{Capability, DictionaryError, Viewer};

/// Definitions of one role, in their display order
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionGroup {
    pub role: String,
    pub texts: Vec<String>,
}

/// A typed relation edge as shown on the gloss page
#[derive(Debug, Clone, Serialize)]
pub struct RelationView {
    pub role: RelationRole,
    pub target_idgloss: String,
    pub target_sn: Option<i64>,
}

/// Look up a gloss by its identifying name.
///
/// The identifier must resolve to exactly one gloss; zero or several
/// matches are both NotFound.
pub async fn gloss_by_idgloss(pool: &SqlitePool, idgloss: &str) -> Result<Gloss, DictionaryError> {
    let mut matches: Vec<Gloss> =
        sqlx::query_as(&format!("SELECT {GLOSS_COLUMNS} FROM glosses WHERE idgloss = ?"))
            .bind(idgloss)
            .fetch_all(pool)
            .await?;

    if matches.len() == 1 {
        Ok(matches.remove(0))
    } else {
        Err(DictionaryError::NotFound)
    }
}

/// Gather the definitions for a gloss, grouped by role and ordered by count
/// within each role. Unpublished definitions are only included for viewers
/// who may see them.
pub async fn definitions_for(
    pool: &SqlitePool,
    gloss_id: i64,
    viewer: &Viewer,
) -> Result<Vec<DefinitionGroup>, DictionaryError> {
    let sql = if viewer.can(Capability::ViewUnpublishedDefs) {
        "SELECT id, gloss_id, text, role, count, published FROM definitions \
         WHERE gloss_id = ? ORDER BY role, count"
    } else {
        "SELECT id, gloss_id, text, role, count, published FROM definitions \
         WHERE gloss_id = ? AND published = 1 ORDER BY role, count"
    };

    let rows: Vec<Definition> = sqlx::query_as(sql).bind(gloss_id).fetch_all(pool).await?;

    let mut groups: Vec<DefinitionGroup> = Vec::new();
    for definition in rows {
        match groups.last_mut() {
            Some(group) if group.role == definition.role => group.texts.push(definition.text),
            _ => groups.push(DefinitionGroup {
                role: definition.role,
                texts: vec![definition.text],
            }),
        }
    }

    Ok(groups)
}

/// The typed relations leaving a gloss
pub async fn relations_for(
    pool: &SqlitePool,
    gloss_id: i64,
) -> Result<Vec<RelationView>, DictionaryError> {
    let rows: Vec<(String, String, Option<i64>)> = sqlx::query_as(
        "SELECT r.role, g.idgloss, g.sn FROM relations r \
         JOIN glosses g ON g.id = r.target_id \
         WHERE r.source_id = ? \
         ORDER BY r.role, g.idgloss",
    )
    .bind(gloss_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(role, target_idgloss, target_sn)| match RelationRole::parse(&role) {
            Some(role) => Some(RelationView {
                role,
                target_idgloss,
                target_sn,
            }),
            None => {
                tracing::warn!("Unknown relation role ignored: {}", role);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::dictionary::testutil::{insert_gloss, member_viewer, memory_pool, staff_viewer};

    async fn insert_definition(
        pool: &SqlitePool,
        gloss_id: i64,
        role: &str,
        count: i64,
        text: &str,
        published: bool,
    ) {
        sqlx::query(
            "INSERT INTO definitions (gloss_id, role, count, text, published) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(gloss_id)
        .bind(role)
        .bind(count)
        .bind(text)
        .bind(published)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_idgloss_must_resolve_to_exactly_one() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        insert_gloss(&pool, "HOUSE", Some(1), true).await;
        insert_gloss(&pool, "TWIN", Some(2), true).await;
        insert_gloss(&pool, "TWIN", Some(3), true).await;

        let gloss = gloss_by_idgloss(&pool, "HOUSE").await.unwrap();
        assert_eq!(gloss.sn, Some(1));

        assert!(matches!(
            gloss_by_idgloss(&pool, "MISSING").await,
            Err(DictionaryError::NotFound)
        ));
        // idgloss is not schema-unique; an ambiguous name is also a miss
        assert!(matches!(
            gloss_by_idgloss(&pool, "TWIN").await,
            Err(DictionaryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_definitions_grouped_by_role_and_ordered() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();
        let gloss_id = insert_gloss(&pool, "HOUSE", Some(1), true).await;

        insert_definition(&pool, gloss_id, "noun", 2, "A dwelling.", true).await;
        insert_definition(&pool, gloss_id, "noun", 1, "A building.", true).await;
        insert_definition(&pool, gloss_id, "general", 1, "Shelter.", true).await;
        insert_definition(&pool, gloss_id, "noun", 3, "Internal draft.", false).await;

        let groups = definitions_for(&pool, gloss_id, &member_viewer())
            .await
            .unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].role, "general");
        assert_eq!(groups[1].role, "noun");
        assert_eq!(groups[1].texts, vec!["A building.", "A dwelling."]);

        // Unpublished texts appear only for capability holders
        let groups = definitions_for(&pool, gloss_id, &staff_viewer())
            .await
            .unwrap();
        assert_eq!(
            groups[1].texts,
            vec!["A building.", "A dwelling.", "Internal draft."]
        );
    }

    #[tokio::test]
    async fn test_relations_list_target_details() {
        let pool = memory_pool().await;
        db::run_migrations(&pool).await.unwrap();

        let house = insert_gloss(&pool, "HOUSE", Some(1), true).await;
        let home = insert_gloss(&pool, "HOME", Some(2), true).await;
        let hut = insert_gloss(&pool, "HUT", None, true).await;

        for (target, role) in [(home, RelationRole::Synonym), (hut, RelationRole::SeeAlso)] {
            sqlx::query("INSERT INTO relations (source_id, target_id, role) VALUES (?, ?, ?)")
                .bind(house)
                .bind(target)
                .bind(role.as_str())
                .execute(&pool)
                .await
                .unwrap();
        }

        // A row with a role outside the known set is dropped, not an error
        sqlx::query("INSERT INTO relations (source_id, target_id, role) VALUES (?, ?, 'sibling')")
            .bind(house)
            .bind(home)
            .execute(&pool)
            .await
            .unwrap();

        let relations = relations_for(&pool, house).await.unwrap();
        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].role, RelationRole::SeeAlso);
        assert_eq!(relations[0].target_idgloss, "HUT");
        assert_eq!(relations[0].target_sn, None);
        assert_eq!(relations[1].role, RelationRole::Synonym);
        assert_eq!(relations[1].target_sn, Some(2));

        // Edges are directed; the target side lists nothing
        assert!(relations_for(&pool, home).await.unwrap().is_empty());
    }
}
