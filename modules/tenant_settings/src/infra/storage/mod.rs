//! Relational storage - database entity, migrations and repository

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use migrations::Migrator;
pub use repositories::SeaOrmSettingStorage;
