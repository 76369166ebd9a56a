//! Networked PostgreSQL backend
//!
//! The server handles writer contention itself, so inserts make a single
//! attempt. Ids are cast to BIGINT so `SERIAL` and `BIGSERIAL` columns both decode.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AdminRepository, MemberRepository};
use crate::config::PgConnectInfo;
use crate::db::password::{hash_password_blocking, match_stored, StoredAdmin};
use crate::db::pool::create_pg_pool;
use crate::db::DbError;
use crate::models::{Admin, AdminCredentials, Member, NewMember};

const SCHEMA: &str = include_str!("../schema/postgres.sql");

/// Member and admin storage on a PostgreSQL server.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and create missing tables.
    pub async fn connect(info: &PgConnectInfo) -> Result<Self, DbError> {
        let pool = create_pg_pool(info).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl MemberRepository for PgStore {
    async fn list_members(&self) -> Result<Vec<Member>, DbError> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT CAST(id AS BIGINT) AS id, name, email, package_type FROM members",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    async fn insert_member(&self, member: NewMember) -> Result<Member, DbError> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO members (name, email, package_type)
            VALUES ($1, $2, $3)
            RETURNING CAST(id AS BIGINT)
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.package_type)
        .fetch_optional(&self.pool)
        .await?;

        let id = id.ok_or(DbError::NotInserted { table: "members" })?;
        Ok(member.with_id(id))
    }

    async fn delete_member(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "member",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, DbError> {
        let admins = sqlx::query_as::<_, Admin>(
            "SELECT CAST(id AS BIGINT) AS id, username FROM admins",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(admins)
    }

    async fn insert_admin(&self, credentials: AdminCredentials) -> Result<Admin, DbError> {
        let AdminCredentials { username, password } = credentials;
        let hash = hash_password_blocking(password).await?;

        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO admins (username, password)
            VALUES ($1, $2)
            RETURNING CAST(id AS BIGINT)
            "#,
        )
        .bind(&username)
        .bind(&hash)
        .fetch_optional(&self.pool)
        .await?;

        let id = id.ok_or(DbError::NotInserted { table: "admins" })?;
        Ok(Admin { id, username })
    }

    async fn authenticate(&self, credentials: &AdminCredentials) -> Result<Admin, DbError> {
        let rows = sqlx::query_as::<_, StoredAdmin>(
            r#"
            SELECT CAST(id AS BIGINT) AS id, username, password
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(&credentials.username)
        .fetch_all(&self.pool)
        .await?;

        match_stored(rows, credentials.password.clone()).await
    }
}
