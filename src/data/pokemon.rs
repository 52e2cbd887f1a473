//! Pokemon data access object

use super::database::{Database, DatabaseError};
use super::models::Pokemon;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};

const SELECT_COLUMNS: &str = "SELECT uuid, name, hp, exp, created_at, updated_at FROM pokemons";

/// Data access object for Pokemon records
#[derive(Clone, Debug)]
pub struct PokemonStore {
    db: Database,
}

impl PokemonStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new Pokemon
    pub fn create(&self, pokemon: &Pokemon) -> Result<(), DatabaseError> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO pokemons (uuid, name, hp, exp, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    pokemon.uuid,
                    pokemon.name,
                    pokemon.hp,
                    pokemon.exp,
                    pokemon.created_at.to_rfc3339(),
                    pokemon.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// Get a Pokemon by uuid
    pub fn get_by_uuid(&self, uuid: &str) -> Result<Option<Pokemon>, DatabaseError> {
        self.db.with_connection(|conn| Self::find(conn, uuid))
    }

    /// Get all Pokemon, sorted by name
    pub fn get_all(&self) -> Result<Vec<Pokemon>, DatabaseError> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY name, uuid"))?;
            let pokemons = stmt
                .query_map([], Self::row_to_pokemon)?
                .collect::<SqliteResult<Vec<_>>>()?;
            Ok(pokemons)
        })
    }

    /// Overwrite every mutable column of a Pokemon
    pub fn update(&self, pokemon: &Pokemon) -> Result<(), DatabaseError> {
        self.db.with_connection(|conn| Self::write(conn, pokemon, Utc::now()))
    }

    /// Delete a Pokemon
    pub fn delete(&self, uuid: &str) -> Result<(), DatabaseError> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM pokemons WHERE uuid = ?1", params![uuid])?;
            Ok(())
        })
    }

    /// Read-modify-write a single Pokemon inside one transaction.
    ///
    /// `apply` returns whether it changed the record; only then is the row
    /// written back. Returns `None` when no Pokemon has this uuid.
    pub fn modify<F>(&self, uuid: &str, apply: F) -> Result<Option<Pokemon>, DatabaseError>
    where
        F: FnOnce(&mut Pokemon) -> bool,
    {
        self.db.with_transaction(|tx| {
            let Some(mut pokemon) = Self::find(tx, uuid)? else {
                return Ok(None);
            };
            if apply(&mut pokemon) {
                let now = Utc::now();
                pokemon.updated_at = now;
                Self::write(tx, &pokemon, now)?;
            }
            Ok(Some(pokemon))
        })
    }

    fn find(conn: &Connection, uuid: &str) -> SqliteResult<Option<Pokemon>> {
        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE uuid = ?1"),
            params![uuid],
            Self::row_to_pokemon,
        )
        .optional()
    }

    fn write(conn: &Connection, pokemon: &Pokemon, now: DateTime<Utc>) -> SqliteResult<()> {
        conn.execute(
            "UPDATE pokemons SET name = ?2, hp = ?3, exp = ?4, updated_at = ?5 WHERE uuid = ?1",
            params![
                pokemon.uuid,
                pokemon.name,
                pokemon.hp,
                pokemon.exp,
                now.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Convert a database row to a Pokemon
    fn row_to_pokemon(row: &rusqlite::Row) -> SqliteResult<Pokemon> {
        let created_at_str: String = row.get(4)?;
        let updated_at_str: String = row.get(5)?;

        Ok(Pokemon {
            uuid: row.get(0)?,
            name: row.get(1)?,
            hp: row.get(2)?,
            exp: row.get(3)?,
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
