use super::binding::TableBinding;
use super::config::SchemaConfig;
use super::payload::InsertPayload;
use super::setup::TableCreateSetup;
use crate::column::ColumnDefinition;
use crate::error::{QueryError, QueryResult};
use crate::expr::WhereClause;
use crate::types::TableId;
use std::any::type_name;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Read access to registered table metadata, plus dispatch on row types.
///
/// Lookups return `None` for unknown ids and names. The provided generic
/// methods resolve a row type's table through [`TableBinding::table_id`]
/// and never need to be overridden.
pub trait SchemaProvider {
    fn table_name(&self, table: TableId) -> Option<&str>;

    fn table_id_by_name(&self, name: &str) -> Option<TableId>;

    /// Column definitions in declared order.
    fn columns(&self, table: TableId) -> Option<&[ColumnDefinition]>;

    fn id_column_name(&self, table: TableId) -> Option<&str>;

    fn create_setup(&self, table: TableId) -> Option<&TableCreateSetup>;

    /// Table of row type `R`, or [`TableId::UNDEFINED`] when `R` is unmapped
    /// or maps to a table this provider does not know.
    fn table_id_for<R: TableBinding>(&self) -> TableId {
        let table = R::table_id();
        if table.is_undefined() || self.table_name(table).is_none() {
            return TableId::UNDEFINED;
        }
        table
    }

    fn table_name_for<R: TableBinding>(&self) -> Option<&str> {
        self.table_name(self.table_id_for::<R>())
    }

    /// Build an insert payload for `rows`.
    ///
    /// The conflict predicate runs first: `Ok(None)` when it rejects the
    /// batch. Otherwise fails when `R` is not bound to a registered table or
    /// when a populate hook writes an unknown column.
    fn build_insert_payload<R: TableBinding>(
        &self,
        rows: &[R],
    ) -> QueryResult<Option<InsertPayload>> {
        if R::has_conflict(rows) {
            tracing::debug!(
                target: "pgcond",
                row_type = type_name::<R>(),
                rows = rows.len(),
                "conflict predicate rejected batch"
            );
            return Ok(None);
        }
        let table = self.table_id_for::<R>();
        if table.is_undefined() {
            return Err(QueryError::TypeNotRegistered(type_name::<R>()));
        }
        let columns = self
            .columns(table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()))?;

        let mut payload = InsertPayload::new(table, columns.to_vec());
        for row in rows {
            payload.add_row(row)?;
        }
        Ok(Some(payload))
    }

    /// Like [`SchemaProvider::build_insert_payload`], but a conflict is an error.
    fn require_insert_payload<R: TableBinding>(&self, rows: &[R]) -> QueryResult<InsertPayload> {
        self.build_insert_payload(rows)?.ok_or_else(|| QueryError::Conflict {
            table: self.table_name_for::<R>().unwrap_or_default().to_string(),
        })
    }

    /// Equality match over the populated fields of `row`.
    ///
    /// `Ok(None)` when the row populates no field.
    fn build_where_tree_from_row<R: TableBinding>(
        &self,
        row: &R,
    ) -> QueryResult<Option<WhereClause>> {
        let Some(payload) = self.build_insert_payload(std::slice::from_ref(row))? else {
            return Ok(None);
        };
        Ok(payload.to_where_clause())
    }
}

/// Tables known to the application, keyed by id and by name.
///
/// Built once through [`RegistryBuilder`] and read-only afterwards, so it
/// can be shared across threads behind an `Arc` or in a `static`.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: BTreeMap<TableId, TableCreateSetup>,
    by_name: HashMap<String, TableId>,
}

impl TableRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build a registry from a declarative schema.
    pub fn from_config(config: SchemaConfig) -> QueryResult<Self> {
        config
            .tables
            .into_iter()
            .fold(Self::builder(), RegistryBuilder::table)
            .build()
    }

    /// Build a registry from a JSON schema document.
    pub fn from_json(json: &str) -> QueryResult<Self> {
        Self::from_config(SchemaConfig::from_json(json)?)
    }

    pub fn to_config(&self) -> SchemaConfig {
        SchemaConfig {
            tables: self.tables.values().cloned().collect(),
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableCreateSetup> {
        self.tables.values()
    }

    pub fn contains(&self, table: TableId) -> bool {
        self.tables.contains_key(&table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// DDL for one table, reference targets resolved by name.
    pub fn create_table_sql(&self, table: TableId) -> QueryResult<String> {
        let setup = self
            .tables
            .get(&table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()))?;
        setup.create_table_sql(|id| self.table_name(id).map(str::to_string))
    }

    /// DDL for every table, referenced tables first.
    pub fn create_all_sql(&self) -> QueryResult<Vec<String>> {
        let mut emitted: HashSet<TableId> = HashSet::new();
        let mut out = Vec::with_capacity(self.tables.len());

        while emitted.len() < self.tables.len() {
            let ready: Vec<TableId> = self
                .tables
                .values()
                .filter(|t| !emitted.contains(&t.id))
                .filter(|t| {
                    t.references
                        .iter()
                        .filter(|r| r.is_foreign_key)
                        .all(|r| r.target_table == t.id || emitted.contains(&r.target_table))
                })
                .map(|t| t.id)
                .collect();
            if ready.is_empty() {
                return Err(QueryError::validation("cyclic references between tables"));
            }
            for id in ready {
                out.push(self.create_table_sql(id)?);
                emitted.insert(id);
            }
        }
        Ok(out)
    }
}

impl SchemaProvider for TableRegistry {
    fn table_name(&self, table: TableId) -> Option<&str> {
        self.tables.get(&table).map(|t| t.name.as_str())
    }

    fn table_id_by_name(&self, name: &str) -> Option<TableId> {
        self.by_name.get(name).copied()
    }

    fn columns(&self, table: TableId) -> Option<&[ColumnDefinition]> {
        self.tables.get(&table).map(|t| t.columns.as_slice())
    }

    fn id_column_name(&self, table: TableId) -> Option<&str> {
        self.tables.get(&table).and_then(|t| t.id_column_name())
    }

    fn create_setup(&self, table: TableId) -> Option<&TableCreateSetup> {
        self.tables.get(&table)
    }
}

/// One-time initialization of a [`TableRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    tables: Vec<TableCreateSetup>,
}

impl RegistryBuilder {
    pub fn table(mut self, setup: TableCreateSetup) -> Self {
        self.tables.push(setup);
        self
    }

    /// Check every table and assemble the registry.
    ///
    /// Fails on the first table whose self-check fails, on duplicate ids
    /// or names, and on foreign keys to tables that were not added.
    pub fn build(self) -> QueryResult<TableRegistry> {
        let mut registry = TableRegistry::default();

        for setup in self.tables {
            if let Err(err) = setup.self_check() {
                tracing::warn!(
                    target: "pgcond",
                    table = %setup.name,
                    error = %err,
                    "table failed self-check"
                );
                return Err(err);
            }
            if registry.tables.contains_key(&setup.id) {
                return Err(QueryError::validation(format!(
                    "duplicate table id {}",
                    setup.id
                )));
            }
            if registry.by_name.contains_key(&setup.name) {
                return Err(QueryError::validation(format!(
                    "duplicate table name '{}'",
                    setup.name
                )));
            }
            registry.by_name.insert(setup.name.clone(), setup.id);
            registry.tables.insert(setup.id, setup);
        }

        for setup in registry.tables.values() {
            for reference in setup.references.iter().filter(|r| r.is_foreign_key) {
                if !registry.tables.contains_key(&reference.target_table) {
                    return Err(QueryError::TableNotFound(reference.target_table.to_string()));
                }
            }
        }

        tracing::debug!(target: "pgcond", tables = registry.len(), "table registry built");
        Ok(registry)
    }
}
