use datamap::Storage;

const SCHEMA: &str = "
create table if not exists houses (
    id integer primary key,
    owner integer not null default 0,
    new_owner integer not null default -1,
    paid integer not null default 0,
    warnings integer not null default 0,
    name text not null default '',
    town_id integer not null default 0,
    rent integer not null default 0,
    size integer not null default 0,
    beds integer not null default 0
);
create table if not exists house_lists (
    house_id integer not null,
    listid integer not null,
    list text not null
);
create table if not exists tile_store (
    house_id integer not null,
    data blob not null
);
";

/// Creates the house tables that are missing.
pub fn ensure_schema(storage: &Storage) -> rusqlite::Result<()> {
    storage.connection().execute_batch(SCHEMA)
}
