use datamap::Storage;
use game::housing::{House, HouseId};
use game::inventory::{ItemGroup, ItemKey, ItemKind};
use game::model::Position;
use game::{Configuration, World};
use prometheus::Registry;
use server::{LocalServerThread, PersistenceMetrics, ServerError};

const COTTAGE: Position = Position::new(10, 10, 7);

fn build_world(world: &mut World, with_items: bool) {
    world.known.items.insert(
        ItemKey(100),
        "apple".to_string(),
        ItemKind {
            id: ItemKey(100),
            name: "apple".to_string(),
            group: ItemGroup::Common,
            movable: true,
            force_serialize: false,
            transform_on_use: None,
            decay_to: None,
            decay_duration: 0,
        },
    );
    world.add_house(House::new(HouseId(1), "Cozy Cottage", 1, 1000), &[COTTAGE]);
    if with_items {
        let apple = world.known.items.get(ItemKey(100)).unwrap();
        world.place_item(COTTAGE, &apple).unwrap();
        world.place_item(COTTAGE, &apple).unwrap();
    }
}

fn config(database: String) -> Configuration {
    Configuration {
        database,
        autosave_interval: 0,
        ..Configuration::default()
    }
}

#[test]
fn test_configuration_is_read_from_file() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("server.json");
    std::fs::write(&path, r#"{"database": "houses.sqlite", "autosave_interval": 60}"#).unwrap();

    let config = Configuration::from_file(&path).unwrap();

    assert_eq!(config.database, "houses.sqlite");
    assert_eq!(config.autosave_interval, 60);
    assert!(!config.transfer_owner_on_restart);
}

#[test]
fn test_houses_are_saved_on_terminate_and_loaded_on_spawn() {
    let directory = tempfile::tempdir().unwrap();
    let database = directory
        .path()
        .join("houses.sqlite")
        .to_string_lossy()
        .to_string();

    let registry = Registry::new();
    let metrics = PersistenceMetrics::new(&registry).unwrap();
    let mut server = LocalServerThread::spawn(config(database.clone()), metrics.clone(), |world| {
        build_world(world, true)
    })
    .unwrap();
    server.terminate().unwrap();
    assert_eq!(metrics.saves.get(), 1);
    assert_eq!(metrics.loaded_rows.get(), 0);

    let storage = Storage::open(&database).unwrap();
    let rows: i64 = storage
        .connection()
        .query_row("select count(*) from tile_store", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    drop(storage);

    let registry = Registry::new();
    let metrics = PersistenceMetrics::new(&registry).unwrap();
    let mut server = LocalServerThread::spawn(config(database), metrics.clone(), |world| {
        build_world(world, false)
    })
    .unwrap();
    assert_eq!(metrics.loaded_rows.get(), 1);
    assert_eq!(metrics.abandoned_rows.get(), 0);
    server.terminate().unwrap();
    assert_eq!(metrics.saves.get(), 1);
    assert_eq!(metrics.failed_saves.get(), 0);
}

#[test]
fn test_spawn_fails_without_database() {
    let directory = tempfile::tempdir().unwrap();
    let database = directory
        .path()
        .join("missing")
        .join("houses.sqlite")
        .to_string_lossy()
        .to_string();
    let metrics = PersistenceMetrics::new(&Registry::new()).unwrap();

    let result = LocalServerThread::spawn(config(database), metrics, |world| {
        build_world(world, true)
    });

    assert!(matches!(result, Err(ServerError::Storage(_))));
}
