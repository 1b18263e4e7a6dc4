//! Per-type handlers that replace structural walking.
//!
//! Handlers suit opaque library types whose fields say nothing useful about
//! their JSON form, such as timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use jschema_config::HandlerConfig;
use num_bigint::BigInt;
use jschema_core::{Describe, Schema, SchemaType};

use crate::registry::Schemas;

impl Schemas {
    /// Use `producer` for every occurrence of `T` instead of walking it.
    ///
    /// The produced schema is stored once under `T`'s display name and cited
    /// by `$ref`. A handler added after `T` was defined does not replace the
    /// existing definition.
    pub fn add_handler<T, F>(&mut self, producer: F)
    where
        T: Describe + ?Sized,
        F: Fn() -> Schema + 'static,
    {
        let desc = T::describe();
        if self.states.contains_key(&desc.id) {
            tracing::warn!(
                type_name = %desc.qualified_name,
                "handler added after the type was defined; existing definition kept"
            );
        }
        self.handlers.insert(desc.id, Box::new(producer));
    }

    /// Map `chrono::DateTime<Utc>` to a `date-time` string.
    pub fn add_timestamp_handler(&mut self) {
        self.add_string_handler::<DateTime<Utc>>("date-time");
    }

    /// Map `chrono::NaiveDate` to a `date` string.
    pub fn add_date_handler(&mut self) {
        self.add_string_handler::<NaiveDate>("date");
    }

    /// Map `num_bigint::BigInt` to a named `number` definition.
    pub fn add_big_int_handler(&mut self) {
        let (title, description) = definition_labels::<BigInt>();
        self.add_handler::<BigInt, _>(move || Schema {
            schema_type: Some(SchemaType::Number),
            title: Some(title.clone()),
            description: Some(description.clone()),
            ..Schema::default()
        });
    }

    /// Map `serde_json::Value` to a named definition that accepts any JSON.
    pub fn add_raw_json_handler(&mut self) {
        let (title, description) = definition_labels::<serde_json::Value>();
        self.add_handler::<serde_json::Value, _>(move || Schema {
            title: Some(title.clone()),
            description: Some(description.clone()),
            ..Schema::default()
        });
    }

    pub(crate) fn install_handlers(&mut self, config: &HandlerConfig) {
        if config.timestamp {
            self.add_timestamp_handler();
        }
        if config.date {
            self.add_date_handler();
        }
        if config.big_int {
            self.add_big_int_handler();
        }
        if config.raw_json {
            self.add_raw_json_handler();
        }
    }

    fn add_string_handler<T: Describe>(&mut self, format: &'static str) {
        let (title, description) = definition_labels::<T>();
        self.add_handler::<T, _>(move || Schema {
            schema_type: Some(SchemaType::String),
            format: Some(format.to_string()),
            title: Some(title.clone()),
            description: Some(description.clone()),
            ..Schema::default()
        });
    }
}

fn definition_labels<T: Describe + ?Sized>() -> (String, String) {
    let desc = T::describe();
    (desc.display_name().to_string(), desc.qualified_name)
}
