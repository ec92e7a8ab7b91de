use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::{Agent, Mission, MissionChanges, MissionSummary, NewAgent, NewTarget, Target};
use crate::error::{AgencyError, Result};
use crate::persistence::{AgentStore, MissionStore};

/// Partial unique index enforcing one active mission per agent
const ACTIVE_MISSION_PER_AGENT_INDEX: &str = "missions_one_active_per_agent";

/// PostgreSQL storage adapter
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(database_url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a PostgreSQL store from an existing connection pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn agent_from_row(row: &PgRow) -> Result<Agent> {
    Ok(Agent {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        years_of_experience: row.try_get("years_of_experience")?,
        breed: row.try_get("breed")?,
        salary: row.try_get("salary")?,
        created_at: row.try_get("created_at")?,
    })
}

fn summary_from_row(row: &PgRow) -> Result<MissionSummary> {
    Ok(MissionSummary {
        id: row.try_get("id")?,
        agent_id: row.try_get("agent_id")?,
        complete: row.try_get("complete")?,
        created_at: row.try_get("created_at")?,
    })
}

fn target_from_row(row: &PgRow) -> Result<Target> {
    Ok(Target {
        id: row.try_get("id")?,
        mission_id: row.try_get("mission_id")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        notes: row.try_get("notes")?,
        complete: row.try_get("complete")?,
    })
}

/// Translate constraint violations raised by mission writes
fn map_mission_write_error(err: sqlx::Error, changes: &MissionChanges) -> AgencyError {
    if let sqlx::Error::Database(db) = &err {
        let agent_id = changes.agent_id.flatten();
        if db.is_unique_violation() && db.constraint() == Some(ACTIVE_MISSION_PER_AGENT_INDEX) {
            if let Some(agent_id) = agent_id {
                return AgencyError::AgentBusy { agent_id };
            }
        }
        if db.is_foreign_key_violation() {
            if let Some(agent_id) = agent_id {
                return AgencyError::Validation(format!("agent {agent_id} does not exist"));
            }
        }
    }
    AgencyError::Database(err)
}

/// A target insert only references the mission row
fn map_target_insert_error(err: sqlx::Error, mission_id: i64) -> AgencyError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_foreign_key_violation() {
            return AgencyError::mission_not_found(mission_id);
        }
    }
    AgencyError::Database(err)
}

#[async_trait]
impl AgentStore for PostgresStore {
    #[instrument(skip(self, agent), fields(name = %agent.name))]
    async fn insert_agent(&self, agent: &NewAgent) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO agents (name, years_of_experience, breed, salary)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&agent.name)
        .bind(agent.years_of_experience)
        .bind(&agent.breed)
        .bind(agent.salary)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    async fn find_agent(&self, id: i64) -> Result<Option<Agent>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, years_of_experience, breed, salary, created_at
            FROM agents WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(agent_from_row).transpose()
    }

    async fn list_agents(&self) -> Result<Vec<Agent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, years_of_experience, breed, salary, created_at
            FROM agents
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(agent_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn update_salary(&self, id: i64, salary: Decimal) -> Result<Option<Agent>> {
        let row = sqlx::query(
            r#"
            UPDATE agents SET salary = $1
            WHERE id = $2
            RETURNING id, name, years_of_experience, breed, salary, created_at
            "#,
        )
        .bind(salary)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(agent_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_agent(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn agent_exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM agents WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

#[async_trait]
impl MissionStore for PostgresStore {
    #[instrument(skip(self, targets), fields(targets = targets.len()))]
    async fn create_mission(&self, targets: &[NewTarget]) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let mission_id: i64 =
            sqlx::query_scalar("INSERT INTO missions (complete) VALUES (FALSE) RETURNING id")
                .fetch_one(&mut *tx)
                .await?;

        if !targets.is_empty() {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO targets (mission_id, name, country) ");
            builder.push_values(targets, |mut row, target| {
                row.push_bind(mission_id)
                    .push_bind(target.name.clone())
                    .push_bind(target.country.clone());
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        debug!("Created mission {} with {} targets", mission_id, targets.len());
        Ok(mission_id)
    }

    async fn list_missions(&self) -> Result<Vec<MissionSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, agent_id, complete, created_at
            FROM missions
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    async fn find_mission(&self, id: i64) -> Result<Option<Mission>> {
        let rows = sqlx::query(
            r#"
            SELECT
                m.id, m.agent_id, m.complete, m.created_at,
                t.id AS target_id, t.name AS target_name, t.country AS target_country,
                t.notes AS target_notes, t.complete AS target_complete
            FROM missions m
            LEFT JOIN targets t ON t.mission_id = m.id
            WHERE m.id = $1
            ORDER BY t.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let mut mission = Mission {
            id: first.try_get("id")?,
            agent_id: first.try_get("agent_id")?,
            complete: first.try_get("complete")?,
            created_at: first.try_get("created_at")?,
            targets: Vec::with_capacity(rows.len()),
        };

        for row in &rows {
            // LEFT JOIN yields one all-NULL target row for a mission without targets
            let Some(target_id) = row.try_get::<Option<i64>, _>("target_id")? else {
                continue;
            };
            mission.targets.push(Target {
                id: target_id,
                mission_id: mission.id,
                name: row.try_get::<Option<String>, _>("target_name")?.unwrap_or_default(),
                country: row
                    .try_get::<Option<String>, _>("target_country")?
                    .unwrap_or_default(),
                notes: row.try_get::<Option<String>, _>("target_notes")?.unwrap_or_default(),
                complete: row
                    .try_get::<Option<bool>, _>("target_complete")?
                    .unwrap_or(false),
            });
        }

        Ok(Some(mission))
    }

    async fn active_missions_for_agent(&self, agent_id: i64) -> Result<Vec<MissionSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, agent_id, complete, created_at
            FROM missions
            WHERE agent_id = $1 AND complete = FALSE
            ORDER BY id ASC
            "#,
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn update_mission(&self, id: i64, changes: MissionChanges) -> Result<bool> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE missions SET ");
        let mut columns = builder.separated(", ");
        if let Some(agent_id) = changes.agent_id {
            columns.push("agent_id = ").push_bind_unseparated(agent_id);
        }
        if let Some(complete) = changes.complete {
            columns.push("complete = ").push_bind_unseparated(complete);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_mission_write_error(e, &changes))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_mission(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM missions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, target), fields(name = %target.name))]
    async fn insert_target(&self, mission_id: i64, target: &NewTarget) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO targets (mission_id, name, country)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(mission_id)
        .bind(&target.name)
        .bind(&target.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_target_insert_error(e, mission_id))?;

        Ok(id)
    }

    #[instrument(skip(self, notes))]
    async fn update_target(
        &self,
        mission_id: i64,
        target_id: i64,
        notes: &str,
        complete: bool,
    ) -> Result<Option<Target>> {
        let row = sqlx::query(
            r#"
            UPDATE targets SET notes = $1, complete = $2
            WHERE id = $3 AND mission_id = $4
            RETURNING id, mission_id, name, country, notes, complete
            "#,
        )
        .bind(notes)
        .bind(complete)
        .bind(target_id)
        .bind(mission_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(target_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_target(&self, mission_id: i64, target_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM targets WHERE id = $1 AND mission_id = $2")
            .bind(target_id)
            .bind(mission_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
