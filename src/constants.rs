pub const DEFAULT_DATABASE_URL: &str = "sqlite://foodgram.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SESSION_SECRET: &str = "secret";

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_LIFETIME_HOURS: i64 = 1;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

pub const RECIPE_NAME_MAX_LENGTH: usize = 128;
pub const TAG_NAME_MAX_LENGTH: usize = 128;
pub const INGREDIENT_NAME_MAX_LENGTH: usize = 128;
pub const MEASUREMENT_UNIT_MAX_LENGTH: usize = 16;

pub const AMOUNT_MAX: i64 = i32::MAX as i64;
pub const COOKING_TIME_MAX: i64 = i32::MAX as i64;

/// SQLite refuses statements with more host parameters than this.
pub const BIND_LIMIT: usize = 32766;
