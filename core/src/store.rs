//! SQLite persistence layer — the storage collaborator.
//!
//! RULE: Only store.rs talks to the database.
//! Phases call store methods — they never execute SQL directly.
//! Each call is individually atomic; the engine does not wrap a step in
//! a transaction (per-row failure granularity is accepted).

use crate::{
    error::{SimError, SimResult},
    event::EventLogEntry,
    types::{EntityId, InterventionKind, SensorKind, SensorStatus, Step},
};
use rusqlite::{params, Connection};

/// A persisted sensor. Coordinates are written once at seeding; only
/// `status` mutates afterwards.
#[derive(Debug, Clone)]
pub struct SensorRow {
    pub sensor_id: EntityId,
    pub kind: SensorKind,
    pub zone: String,
    pub status: SensorStatus,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct VehicleRow {
    pub vehicle_id: EntityId,
    pub plate: String,
}

#[derive(Debug, Clone)]
pub struct CitizenRow {
    pub citizen_id: EntityId,
    pub name: String,
    pub email: String,
    pub eco_score: i64,
    pub mobility_preference: String,
}

#[derive(Debug, Clone)]
pub struct TripRow {
    pub trip_id: EntityId,
    pub vehicle_id: EntityId,
    pub origin_zone: String,
    pub destination_zone: String,
    pub duration_min: i64,
    pub co2_saved_kg: f64,
    pub step: Step,
}

#[derive(Debug, Clone)]
pub struct InterventionRow {
    pub intervention_id: EntityId,
    pub sensor_id: EntityId,
    pub kind: InterventionKind,
    pub duration_min: i64,
    pub cost: f64,
    pub co2_impact_kg: f64,
    pub step: Step,
}

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the simulation database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_city.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, now()],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, step, phase, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.run_id,
                entry.step as i64,
                entry.phase,
                entry.event_type,
                entry.payload,
                now(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_step(&self, run_id: &str, step: Step) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, step, phase, event_type, payload
             FROM event_log WHERE run_id = ?1 AND step = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id, step as i64], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    run_id: row.get(1)?,
                    step: row.get::<_, i64>(2)? as u64,
                    phase: row.get(3)?,
                    event_type: row.get(4)?,
                    payload: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Sensors ────────────────────────────────────────────────

    pub fn insert_sensor(&self, sensor: &SensorRow) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO sensor (sensor_id, kind, zone, status, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sensor.sensor_id,
                sensor.kind.as_str(),
                sensor.zone,
                sensor.status.as_str(),
                sensor.latitude,
                sensor.longitude,
            ],
        )?;
        Ok(())
    }

    pub fn list_sensors(&self) -> SimResult<Vec<SensorRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT sensor_id, kind, zone, status, latitude, longitude
             FROM sensor ORDER BY sensor_id",
        )?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(sensor_id, kind, zone, status, latitude, longitude)| {
                Ok(SensorRow {
                    sensor_id,
                    kind: SensorKind::from_str(&kind).ok_or(SimError::InvalidStoredValue {
                        field: "kind",
                        value: kind,
                    })?,
                    zone,
                    status: SensorStatus::from_str(&status).ok_or(
                        SimError::InvalidStoredValue {
                            field: "status",
                            value: status,
                        },
                    )?,
                    latitude,
                    longitude,
                })
            })
            .collect()
    }

    pub fn update_sensor_status(&self, sensor_id: &str, status: SensorStatus) -> SimResult<()> {
        let updated = self.conn.execute(
            "UPDATE sensor SET status = ?1 WHERE sensor_id = ?2",
            params![status.as_str(), sensor_id],
        )?;
        if updated == 0 {
            return Err(SimError::SensorNotFound {
                id: sensor_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn sensor_status(&self, sensor_id: &str) -> SimResult<SensorStatus> {
        let status: String = self.conn.query_row(
            "SELECT status FROM sensor WHERE sensor_id = ?1",
            params![sensor_id],
            |row| row.get(0),
        )?;
        SensorStatus::from_str(&status).ok_or(SimError::InvalidStoredValue {
            field: "status",
            value: status,
        })
    }

    pub fn sensor_count(&self) -> SimResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM sensor", [], |row| row.get(0))?)
    }

    // ── Vehicles ───────────────────────────────────────────────

    pub fn insert_vehicle(&self, vehicle: &VehicleRow) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO vehicle (vehicle_id, plate) VALUES (?1, ?2)",
            params![vehicle.vehicle_id, vehicle.plate],
        )?;
        Ok(())
    }

    pub fn list_vehicles(&self) -> SimResult<Vec<VehicleRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT vehicle_id, plate FROM vehicle ORDER BY vehicle_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(VehicleRow {
                    vehicle_id: row.get(0)?,
                    plate: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Citizens ───────────────────────────────────────────────

    pub fn insert_citizen(&self, citizen: &CitizenRow) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO citizen (citizen_id, name, email, eco_score, mobility_preference)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                citizen.citizen_id,
                citizen.name,
                citizen.email,
                citizen.eco_score,
                citizen.mobility_preference,
            ],
        )?;
        Ok(())
    }

    pub fn citizen_count(&self) -> SimResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM citizen", [], |row| row.get(0))?)
    }

    // ── Trips ──────────────────────────────────────────────────

    pub fn create_trip(&self, trip: &TripRow) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO trip (trip_id, vehicle_id, origin_zone, destination_zone,
                               duration_min, co2_saved_kg, step, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                trip.trip_id,
                trip.vehicle_id,
                trip.origin_zone,
                trip.destination_zone,
                trip.duration_min,
                trip.co2_saved_kg,
                trip.step as i64,
                now(),
            ],
        )?;
        Ok(())
    }

    pub fn trip_count(&self) -> SimResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM trip", [], |row| row.get(0))?)
    }

    pub fn trips_for_step(&self, step: Step) -> SimResult<Vec<TripRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT trip_id, vehicle_id, origin_zone, destination_zone,
                    duration_min, co2_saved_kg, step
             FROM trip WHERE step = ?1 ORDER BY trip_id",
        )?;
        let rows = stmt
            .query_map(params![step as i64], |row| {
                Ok(TripRow {
                    trip_id: row.get(0)?,
                    vehicle_id: row.get(1)?,
                    origin_zone: row.get(2)?,
                    destination_zone: row.get(3)?,
                    duration_min: row.get(4)?,
                    co2_saved_kg: row.get(5)?,
                    step: row.get::<_, i64>(6)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Interventions ──────────────────────────────────────────

    pub fn create_intervention(&self, intervention: &InterventionRow) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO intervention (intervention_id, sensor_id, kind, duration_min,
                                       cost, co2_impact_kg, step, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                intervention.intervention_id,
                intervention.sensor_id,
                intervention.kind.as_str(),
                intervention.duration_min,
                intervention.cost,
                intervention.co2_impact_kg,
                intervention.step as i64,
                now(),
            ],
        )?;
        Ok(())
    }

    pub fn intervention_count(&self) -> SimResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM intervention", [], |row| row.get(0))?)
    }

    pub fn interventions_for_sensor(&self, sensor_id: &str) -> SimResult<Vec<InterventionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT intervention_id, sensor_id, kind, duration_min, cost, co2_impact_kg, step
             FROM intervention WHERE sensor_id = ?1 ORDER BY intervention_id",
        )?;
        let raw = stmt
            .query_map(params![sensor_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(
                |(intervention_id, sensor_id, kind, duration_min, cost, co2_impact_kg, step)| {
                    Ok(InterventionRow {
                        intervention_id,
                        sensor_id,
                        kind: InterventionKind::from_str(&kind).ok_or(
                            SimError::InvalidStoredValue {
                                field: "kind",
                                value: kind,
                            },
                        )?,
                        duration_min,
                        cost,
                        co2_impact_kg,
                        step: step as u64,
                    })
                },
            )
            .collect()
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
