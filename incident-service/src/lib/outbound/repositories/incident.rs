use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::incident::errors::IncidentError;
use crate::domain::incident::models::Floor;
use crate::domain::incident::models::Incident;
use crate::domain::incident::models::IncidentId;
use crate::domain::incident::ports::IncidentRepository;

const COLUMNS: &str = "id, titulo, descripcion, tipo, piso, lugar_especifico, foto, \
     nivel_riesgo, fecha_creacion, estado, veces_reportado, reportado_por, nombre_reportero";

/// Incident store backed by a Postgres table keyed by id.
///
/// A `seq` column records insertion order so scans are deterministic.
pub struct PostgresIncidentRepository {
    pool: PgPool,
    table: String,
}

impl PostgresIncidentRepository {
    /// # Arguments
    /// * `pool` - Connection pool
    /// * `table` - Table name, already validated as a plain SQL identifier
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Create the incidents table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                titulo TEXT NOT NULL,
                descripcion TEXT NOT NULL,
                tipo TEXT NOT NULL,
                piso INTEGER NOT NULL,
                lugar_especifico TEXT NOT NULL,
                foto TEXT,
                nivel_riesgo TEXT NOT NULL,
                fecha_creacion TIMESTAMPTZ NOT NULL,
                estado TEXT NOT NULL,
                veces_reportado INTEGER NOT NULL,
                reportado_por TEXT NOT NULL,
                nombre_reportero TEXT NOT NULL
            )
            "#,
            self.table
        );
        sqlx::query(&query).execute(&self.pool).await?;

        Ok(())
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, IncidentError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| IncidentError::DatabaseError(e.to_string()))
}

fn incident_from_row(row: &PgRow) -> Result<Incident, IncidentError> {
    let corrupt = |e: String| IncidentError::DatabaseError(format!("Corrupt incident row: {}", e));

    let tipo: String = column(row, "tipo")?;
    let nivel_riesgo: String = column(row, "nivel_riesgo")?;
    let estado: String = column(row, "estado")?;
    let veces_reportado: i32 = column(row, "veces_reportado")?;

    Ok(Incident {
        id: IncidentId(column::<Uuid>(row, "id")?),
        title: column(row, "titulo")?,
        description: column(row, "descripcion")?,
        incident_type: tipo.parse().map_err(|e| corrupt(format!("{}", e)))?,
        floor: Floor::from(column::<i32>(row, "piso")?),
        specific_location: column(row, "lugar_especifico")?,
        photo: column(row, "foto")?,
        risk_level: nivel_riesgo.parse().map_err(corrupt)?,
        created_at: column(row, "fecha_creacion")?,
        status: estado.parse().map_err(corrupt)?,
        report_count: u32::try_from(veces_reportado).map_err(|e| corrupt(e.to_string()))?,
        reported_by_email: column(row, "reportado_por")?,
        reporter_name: column(row, "nombre_reportero")?,
    })
}

#[async_trait]
impl IncidentRepository for PostgresIncidentRepository {
    async fn create(&self, incident: Incident) -> Result<Incident, IncidentError> {
        let report_count = i32::try_from(incident.report_count)
            .map_err(|e| IncidentError::Unknown(e.to_string()))?;

        let query = format!(
            r#"
            INSERT INTO {} ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
            self.table, COLUMNS
        );
        sqlx::query(&query)
            .bind(incident.id.0)
            .bind(&incident.title)
            .bind(&incident.description)
            .bind(incident.incident_type.as_str())
            .bind(incident.floor.value())
            .bind(&incident.specific_location)
            .bind(incident.photo.as_deref())
            .bind(incident.risk_level.as_str())
            .bind(incident.created_at)
            .bind(incident.status.as_str())
            .bind(report_count)
            .bind(&incident.reported_by_email)
            .bind(&incident.reporter_name)
            .execute(&self.pool)
            .await
            .map_err(|e| IncidentError::DatabaseError(e.to_string()))?;

        Ok(incident)
    }

    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<Incident>, IncidentError> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, self.table);
        let row = sqlx::query(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| IncidentError::DatabaseError(e.to_string()))?;

        row.as_ref().map(incident_from_row).transpose()
    }

    async fn scan(&self) -> Result<Vec<Incident>, IncidentError> {
        let query = format!("SELECT {} FROM {} ORDER BY seq", COLUMNS, self.table);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| IncidentError::DatabaseError(e.to_string()))?;

        rows.iter().map(incident_from_row).collect()
    }
}
