//! PostgreSQL ledger store
//!
//! Two tables: `ingredients` and `inventory_txns`. On-hand is a SUM over
//! `inventory_txns`; conditional appends lock the ingredient row so the
//! re-read and the insert see no interleaved writer.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Direction, Ingredient, Movement, NewIngredient, NewMovement};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use super::{check_usage_and_par, prepare_ingredient, prepare_movement, LedgerStore};
use crate::error::{AppError, AppResult};

const INGREDIENT_COLUMNS: &str =
    "id, name, unit, vendor, area, weekly_usage, par, cost_per_unit, created_at";

const MOVEMENT_COLUMNS: &str = "id, ingredient_id, type, qty, unit_cost, source, ref_id, created_at";

const ON_HAND_SQL: &str = r#"
    SELECT COALESCE(SUM(CASE WHEN type = 'in' THEN qty ELSE -qty END), 0)
    FROM inventory_txns
    WHERE ingredient_id = $1
"#;

/// Ledger store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgLedgerStore {
    db: PgPool,
}

/// Row for ingredient queries
#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    name: String,
    unit: String,
    vendor: Option<String>,
    area: Option<String>,
    weekly_usage: Decimal,
    par: Option<Decimal>,
    cost_per_unit: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            name: row.name,
            unit: row.unit,
            vendor: row.vendor,
            area: row.area,
            weekly_usage: row.weekly_usage,
            par_override: row.par,
            cost_per_unit: row.cost_per_unit,
            created_at: row.created_at,
        }
    }
}

/// Row for movement queries
#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    ingredient_id: Uuid,
    #[sqlx(rename = "type")]
    direction: String,
    qty: Decimal,
    unit_cost: Option<Decimal>,
    source: String,
    ref_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let direction: Direction = row
            .direction
            .parse()
            .map_err(|e| AppError::Internal(format!("Corrupt movement {}: {}", row.id, e)))?;

        Ok(Movement {
            id: row.id,
            ingredient_id: row.ingredient_id,
            direction,
            quantity: row.qty,
            unit_cost: row.unit_cost,
            source: row.source,
            reference: row.ref_id,
            created_at: row.created_at,
        })
    }
}

impl PgLedgerStore {
    /// Create a new PgLedgerStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    /// Release pooled connections
    pub async fn close(&self) {
        self.db.close().await;
    }

    async fn insert_movement(conn: &mut PgConnection, movement: &NewMovement) -> AppResult<Movement> {
        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            INSERT INTO inventory_txns (ingredient_id, type, qty, unit_cost, source, ref_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(movement.ingredient_id)
        .bind(movement.direction.as_str())
        .bind(movement.quantity)
        .bind(movement.unit_cost)
        .bind(&movement.source)
        .bind(&movement.reference)
        .fetch_one(&mut *conn)
        .await?;

        row.try_into()
    }

    async fn on_hand(conn: &mut PgConnection, ingredient_id: Uuid) -> AppResult<Decimal> {
        let on_hand = sqlx::query_scalar::<_, Decimal>(ON_HAND_SQL)
            .bind(ingredient_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(on_hand)
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn create_ingredient(&self, input: NewIngredient) -> AppResult<Ingredient> {
        let input = prepare_ingredient(input)?;

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            INSERT INTO ingredients (name, unit, vendor, area, weekly_usage, par, cost_per_unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            INGREDIENT_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.unit)
        .bind(&input.vendor)
        .bind(&input.area)
        .bind(input.weekly_usage)
        .bind(input.par_override)
        .bind(input.cost_per_unit)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn get_ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {} FROM ingredients WHERE id = $1",
            INGREDIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Ingredient::from))
    }

    async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {} FROM ingredients ORDER BY name, id",
            INGREDIENT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn set_usage_and_par(
        &self,
        id: Uuid,
        weekly_usage: Decimal,
        par_override: Option<Decimal>,
    ) -> AppResult<Ingredient> {
        check_usage_and_par(weekly_usage, par_override)?;
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            UPDATE ingredients
               SET weekly_usage = $1,
                   par = $2
             WHERE id = $3
            RETURNING {}
            "#,
            INGREDIENT_COLUMNS
        ))
        .bind(weekly_usage)
        .bind(par_override)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        Ok(row.into())
    }

    async fn get_on_hand(&self, ingredient_id: Uuid) -> AppResult<Decimal> {
        let mut conn = self.db.acquire().await?;
        Self::on_hand(&mut *conn, ingredient_id).await
    }

    async fn get_on_hand_all(&self) -> AppResult<HashMap<Uuid, Decimal>> {
        let rows = sqlx::query_as::<_, (Uuid, Decimal)>(
            r#"
            WITH onhand AS (
                SELECT ingredient_id,
                       SUM(CASE WHEN type = 'in' THEN qty ELSE -qty END) AS on_hand
                FROM inventory_txns
                GROUP BY ingredient_id
            )
            SELECT i.id, COALESCE(o.on_hand, 0)
            FROM ingredients i
            LEFT JOIN onhand o ON o.ingredient_id = i.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn list_movements(&self, ingredient_id: Uuid) -> AppResult<Vec<Movement>> {
        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            SELECT {}
            FROM inventory_txns
            WHERE ingredient_id = $1
            ORDER BY created_at, id
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(ingredient_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Movement::try_from).collect()
    }

    async fn append_movement(&self, movement: NewMovement) -> AppResult<Movement> {
        let movement = prepare_movement(movement)?;

        // Validate ingredient exists
        let ingredient_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = $1)",
        )
        .bind(movement.ingredient_id)
        .fetch_one(&self.db)
        .await?;

        if !ingredient_exists {
            return Err(AppError::unknown_ingredient(movement.ingredient_id));
        }

        let mut conn = self.db.acquire().await?;
        Self::insert_movement(&mut *conn, &movement).await
    }

    async fn append_movement_if_on_hand(
        &self,
        movement: NewMovement,
        expected_on_hand: Decimal,
    ) -> AppResult<Option<Movement>> {
        let movement = prepare_movement(movement)?;
        let mut tx = self.db.begin().await?;

        // Row lock; plain appends take FOR KEY SHARE through the foreign key
        // and wait behind it
        let locked = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM ingredients WHERE id = $1 FOR UPDATE",
        )
        .bind(movement.ingredient_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Err(AppError::unknown_ingredient(movement.ingredient_id));
        }

        let current = Self::on_hand(&mut *tx, movement.ingredient_id).await?;
        if current != expected_on_hand {
            tx.rollback().await?;
            return Ok(None);
        }

        let inserted = Self::insert_movement(&mut *tx, &movement).await?;
        tx.commit().await?;
        Ok(Some(inserted))
    }
}
