//! User Repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use shared::error::{AppError, ErrorCode};
use shared::models::User;

const SELECT_USER: &str = "SELECT id, username, display_name, property_role, company_id, \
                           active_location, is_active, created_at FROM app_user";

pub struct NewUser<'a> {
    pub username: &'a str,
    pub display_name: &'a str,
    pub password_hash: &'a str,
    pub property_role: &'a str,
    pub company_id: i64,
    pub active_location: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// User plus its password hash, for login only
pub async fn find_by_username_with_hash(
    pool: &SqlitePool,
    username: &str,
) -> RepoResult<Option<(User, String)>> {
    let row = sqlx::query_as::<_, UserWithHash>(
        "SELECT id, username, display_name, property_role, company_id, active_location, \
         is_active, created_at, password_hash FROM app_user WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| (r.user, r.password_hash)))
}

/// All users, or those of one agency
pub async fn find_all(pool: &SqlitePool, company_id: Option<i64>) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "{SELECT_USER} WHERE (?1 IS NULL OR company_id = ?1) ORDER BY username"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM app_user")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: NewUser<'_>) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO app_user (username, display_name, password_hash, property_role, \
         company_id, active_location, is_active, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, 1, ?) RETURNING id",
    )
    .bind(data.username)
    .bind(data.display_name)
    .bind(data.password_hash)
    .bind(data.property_role)
    .bind(data.company_id)
    .bind(data.active_location)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Rejected(
            AppError::new(ErrorCode::UsernameExists).with_detail("username", data.username),
        ),
        other => other,
    })?;

    fetch(pool, id).await
}

pub async fn update_role(pool: &SqlitePool, id: i64, property_role: &str) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE app_user SET property_role = ? WHERE id = ?")
        .bind(property_role)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    fetch(pool, id).await
}

pub async fn update_status(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE app_user SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    fetch(pool, id).await
}

pub async fn update_active_location(
    pool: &SqlitePool,
    id: i64,
    location_id: Option<i64>,
) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE app_user SET active_location = ? WHERE id = ?")
        .bind(location_id)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    fetch(pool, id).await
}

async fn fetch(pool: &SqlitePool, id: i64) -> RepoResult<User> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::agency;
    use crate::db::DbService;

    async fn setup() -> (SqlitePool, i64) {
        let pool = DbService::in_memory().await.unwrap().pool;
        let agency = agency::create(&pool, "Harbor House", None).await.unwrap();
        (pool, agency.id)
    }

    fn new_user(username: &str, company_id: i64) -> NewUser<'_> {
        NewUser {
            username,
            display_name: "Someone",
            password_hash: "hash",
            property_role: "Agent",
            company_id,
            active_location: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (pool, agency_id) = setup().await;
        let user = create(&pool, new_user("jdoe", agency_id)).await.unwrap();
        assert!(user.is_active);
        assert_eq!(user.property_role, "Agent");

        let (found, hash) = find_by_username_with_hash(&pool, "jdoe")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, user);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let (pool, agency_id) = setup().await;
        create(&pool, new_user("jdoe", agency_id)).await.unwrap();

        let err = create(&pool, new_user("jdoe", agency_id)).await.unwrap_err();
        match err {
            RepoError::Rejected(e) => assert_eq!(e.code, ErrorCode::UsernameExists),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_role_survives_round_trip() {
        let (pool, agency_id) = setup().await;
        let user = create(&pool, new_user("legacy", agency_id)).await.unwrap();
        let user = update_role(&pool, user.id, "Volunteer").await.unwrap();
        assert_eq!(user.property_role, "Volunteer");
        assert_eq!(user.role(), None);
    }

    #[tokio::test]
    async fn test_status_and_location_updates() {
        let (pool, agency_id) = setup().await;
        let location = agency::create(&pool, "East", Some(agency_id)).await.unwrap();
        let user = create(&pool, new_user("jdoe", agency_id)).await.unwrap();

        let user = update_status(&pool, user.id, false).await.unwrap();
        assert!(!user.is_active);

        let user = update_active_location(&pool, user.id, Some(location.id))
            .await
            .unwrap();
        assert_eq!(user.active_location, Some(location.id));

        assert!(matches!(
            update_status(&pool, 999, true).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_all_filters_by_agency() {
        let (pool, agency_id) = setup().await;
        let other = agency::create(&pool, "Other", None).await.unwrap();
        create(&pool, new_user("a", agency_id)).await.unwrap();
        create(&pool, new_user("b", other.id)).await.unwrap();

        assert_eq!(find_all(&pool, None).await.unwrap().len(), 2);
        let scoped = find_all(&pool, Some(other.id)).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].username, "b");
    }
}
