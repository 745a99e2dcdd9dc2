//! DDL scripts shipped as resources, one set per platform family.
//!
//! H2 and PostgreSQL share a script; MySQL and MariaDB each get their own,
//! even though today they're textually identical — they're kept as separate
//! files so one engine can diverge without touching the other.

use crate::platform::Platform;

const H2_POSTGRESQL: &str = include_str!("../ddl/h2_postgresql.sql");
const MYSQL: &str = include_str!("../ddl/mysql.sql");
const MARIADB: &str = include_str!("../ddl/mariadb.sql");

/// The DDL script for a given platform.
pub fn script_for(platform: Platform) -> &'static str {
    match platform {
        Platform::H2 | Platform::Postgresql => H2_POSTGRESQL,
        Platform::Mysql => MYSQL,
        Platform::MariaDb => MARIADB,
    }
}
