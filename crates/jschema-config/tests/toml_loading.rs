//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use jschema_config::{ConfigError, SchemasConfig};
use pretty_assertions::assert_eq;

#[test]
fn loads_prefix_and_handlers_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r##"
ref_prefix = "#/components/schemas"
pretty = false

[handlers]
timestamp = false
raw_json = true
"##,
        )?;

        let config: SchemasConfig = Figment::from(Serialized::defaults(SchemasConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.ref_prefix, "#/components/schemas");
        assert!(!config.pretty);
        assert!(!config.handlers.timestamp);
        assert!(config.handlers.date);
        assert!(config.handlers.raw_json);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "pretty = false\n")?;

        let config: SchemasConfig = Figment::from(Serialized::defaults(SchemasConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.ref_prefix, "#/$defs");
        assert!(!config.pretty);
        assert!(config.handlers.timestamp);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "ref_prefix = \"#/definitions\"\n")?;
        jail.set_env("JSCHEMA_REF_PREFIX", "#/components/schemas");
        jail.set_env("JSCHEMA_HANDLERS__DATE", "false");

        let config: SchemasConfig = Figment::from(Serialized::defaults(SchemasConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("JSCHEMA_").split("__"))
            .extract()?;

        assert_eq!(config.ref_prefix, "#/components/schemas");
        assert!(!config.handlers.date);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file("jschema.toml", "ref_prefix = \"#/definitions\"\n")?;

        let config = SchemasConfig::load().expect("config loads");
        assert_eq!(config.ref_prefix, "#/definitions");
        Ok(())
    });
}

#[test]
fn load_rejects_invalid_prefix() {
    Jail::expect_with(|jail| {
        jail.set_env("JSCHEMA_REF_PREFIX", "components/schemas");

        let result = SchemasConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}
