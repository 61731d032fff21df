#![allow(dead_code)]

use std::collections::HashMap;

use datamap::Storage;
use game::housing::{House, HouseId};
use game::inventory::{Item, ItemId, ItemVariant};
use game::model::Position;
use game::persistence::{ensure_schema, LoadReport, MapSerializer, PersistenceError};
use game::timing::{Decay, DecayTimeline};
use game::{Configuration, World};

pub const FLOOR: u8 = 7;

pub fn at(x: u16, y: u16) -> Position {
    Position::new(x, y, FLOOR)
}

const CATALOG: &str = "
create table item_types (
    id integer primary key,
    name text not null,
    category text not null,
    movable integer not null,
    force_serialize integer not null,
    transform_on_use integer,
    decay_to integer,
    decay_duration integer not null
);
insert into item_types values (100, 'apple', 'Common', 1, 0, null, null, 0);
insert into item_types values (101, 'coin', 'Common', 1, 0, null, null, 0);
insert into item_types values (102, 'letter', 'Common', 1, 0, null, null, 0);
insert into item_types values (103, 'torch', 'Common', 1, 0, null, null, 10);
insert into item_types values (104, 'rune', 'Teleport', 1, 0, null, null, 0);
insert into item_types values (200, 'backpack', 'Container', 1, 0, null, null, 0);
insert into item_types values (300, 'chest', 'Container', 0, 1, null, null, 0);
insert into item_types values (400, 'door', 'Door', 0, 0, 401, null, 0);
insert into item_types values (401, 'open door', 'Door', 0, 0, 400, null, 0);
insert into item_types values (500, 'lamp', 'Common', 0, 1, 501, null, 0);
insert into item_types values (501, 'lit lamp', 'Common', 0, 1, 500, 500, 60);
insert into item_types values (600, 'carpet', 'Carpet', 0, 0, null, null, 0);
insert into item_types values (700, 'wall', 'Common', 0, 0, null, null, 0);
insert into item_types values (800, 'crate', 'Container', 0, 1, null, 801, 30);
insert into item_types values (801, 'broken crate', 'Common', 0, 1, 800, null, 0);
insert into item_types values (1500, 'old bed', 'Bed', 0, 0, null, null, 0);
insert into item_types values (30001, 'bed', 'Bed', 0, 0, null, null, 0);
";

/// Static part of the world that is rebuilt on every restart.
struct Fixture {
    name: String,
    kind: String,
    position: Position,
    door_id: u8,
}

struct HouseDefinition {
    id: HouseId,
    name: String,
    tiles: Vec<Position>,
}

pub struct HousingTestScenario {
    storage: Storage,
    config: Configuration,
    world: World,
    decay: DecayTimeline,
    houses: Vec<HouseDefinition>,
    map: Vec<Fixture>,
    items: HashMap<String, ItemId>,
    report: Option<LoadReport>,
    save_result: Option<Result<usize, PersistenceError>>,
}

impl HousingTestScenario {
    pub fn new() -> Self {
        let storage = Storage::open_in_memory().unwrap();
        storage.connection().execute_batch(CATALOG).unwrap();
        ensure_schema(&storage).unwrap();
        let mut world = World::new();
        world.load_game_knowledge(&storage).unwrap();
        HousingTestScenario {
            storage,
            config: Configuration::default(),
            world,
            decay: DecayTimeline::default(),
            houses: vec![],
            map: vec![],
            items: HashMap::new(),
            report: None,
            save_result: None,
        }
    }

    pub fn item(&self, name: &str) -> ItemId {
        *self.items.get(name).unwrap()
    }

    pub fn given_config<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut Configuration),
    {
        configure(&mut self.config);
        self
    }

    pub fn given_house(mut self, id: u32, name: &str, tiles: &[Position]) -> Self {
        let house = House::new(HouseId(id), name, 1, 1000);
        self.world.add_house(house, tiles);
        self.houses.push(HouseDefinition {
            id: HouseId(id),
            name: name.to_string(),
            tiles: tiles.to_vec(),
        });
        self
    }

    pub fn given_house_owner(mut self, id: u32, owner: u32) -> Self {
        self.world.housing.get_house_mut(HouseId(id)).unwrap().owner = owner;
        self
    }

    pub fn given_access_list(mut self, id: u32, list: u32, text: &str) -> Self {
        self.world.set_access_list(HouseId(id), list, text).unwrap();
        self
    }

    /// Map item that exists before any house state is loaded.
    pub fn given_fixture(self, kind: &str, name: &str, position: Position) -> Self {
        self.given_door(kind, name, position, 0)
    }

    pub fn given_door(mut self, kind: &str, name: &str, position: Position, door_id: u8) -> Self {
        let fixture = Fixture {
            name: name.to_string(),
            kind: kind.to_string(),
            position,
            door_id,
        };
        let id = place_fixture(&mut self.world, &fixture);
        self.items.insert(name.to_string(), id);
        self.map.push(fixture);
        self
    }

    pub fn given_removed_from_map(mut self, name: &str) -> Self {
        self.map.retain(|fixture| fixture.name != name);
        self
    }

    pub fn given_item(mut self, kind: &str, name: &str, position: Position) -> Self {
        let kind = self.world.known.items.find(kind).unwrap();
        let id = self.world.place_item(position, &kind).unwrap();
        self.items.insert(name.to_string(), id);
        self
    }

    pub fn given_item_in(mut self, kind: &str, name: &str, container: &str) -> Self {
        let container = self.item(container);
        let kind = self.world.known.items.find(kind).unwrap();
        let id = self.world.put_item(container, &kind).unwrap();
        self.items.insert(name.to_string(), id);
        self
    }

    pub fn given_item_changed<F>(mut self, name: &str, change: F) -> Self
    where
        F: FnOnce(&mut Item),
    {
        let id = self.item(name);
        change(self.world.inventory.get_item_mut(id).unwrap());
        self
    }

    pub fn given_item_transformed(mut self, name: &str, kind: &str) -> Self {
        let id = self.item(name);
        let key = self.world.known.items.find(kind).unwrap().id;
        self.world.transform_item(id, key).unwrap();
        self
    }

    pub fn given_sleeper(mut self, name: &str, sleeper: u32) -> Self {
        let id = self.item(name);
        if let ItemVariant::Bed {
            sleeper: current,
            sleep_start,
        } = &mut self.world.inventory.get_item_mut(id).unwrap().variant
        {
            *current = sleeper;
            *sleep_start = 1_700_000_000;
        }
        self.world.claim_bed(sleeper, id);
        self
    }

    pub fn given_sql(self, sql: &str) -> Self {
        self.storage.connection().execute_batch(sql).unwrap();
        self
    }

    pub fn given_stored_tile(self, house: u32, data: &[u8]) -> Self {
        self.storage
            .connection()
            .execute(
                "insert into tile_store (house_id, data) values (?, ?)",
                rusqlite::params![house, data],
            )
            .unwrap();
        self
    }

    pub fn given_stored_tiles_changed<F>(self, change: F) -> Self
    where
        F: Fn(usize, &mut Vec<u8>),
    {
        let rows = self.stored_tiles();
        self.storage
            .connection()
            .execute("delete from tile_store", [])
            .unwrap();
        for (index, (house, mut data)) in rows.into_iter().enumerate() {
            change(index, &mut data);
            self.storage
                .connection()
                .execute(
                    "insert into tile_store (house_id, data) values (?, ?)",
                    rusqlite::params![house, data],
                )
                .unwrap();
        }
        self
    }

    pub fn given_world_saved(self) -> Self {
        self.when_world_saved()
    }

    pub fn when_world_saved(mut self) -> Self {
        let mut serializer = MapSerializer::new(&mut self.storage, &self.config);
        let result = serializer
            .save_house_info(&self.world)
            .and_then(|_| serializer.save_house_items(&self.world));
        self.save_result = Some(result);
        self
    }

    pub fn when_items_saved(mut self) -> Self {
        let mut serializer = MapSerializer::new(&mut self.storage, &self.config);
        self.save_result = Some(serializer.save_house_items(&self.world));
        self
    }

    /// Rebuilds the world from the catalog, houses and map fixtures, then
    /// restores house items and house info from the store. Map fixtures
    /// start decaying as soon as they are placed.
    pub fn when_server_restarted(mut self) -> Self {
        let mut world = World::new();
        world.load_game_knowledge(&self.storage).unwrap();
        for house in &self.houses {
            world.add_house(House::new(house.id, &house.name, 1, 1000), &house.tiles);
        }
        self.items.clear();
        let mut decay = DecayTimeline::default();
        for fixture in &self.map {
            let id = place_fixture(&mut world, fixture);
            decay.begin_decay(world.inventory.get_item(id).unwrap());
            self.items.insert(fixture.name.clone(), id);
        }
        self.world = world;
        self.decay = decay;
        let mut serializer = MapSerializer::new(&mut self.storage, &self.config);
        let report = serializer
            .load_house_items(&mut self.world, &mut self.decay)
            .unwrap();
        serializer.load_house_info(&mut self.world).unwrap();
        self.report = Some(report);
        self
    }

    pub fn then_save_should_succeed(self) -> Self {
        match &self.save_result {
            Some(Ok(_)) => {}
            other => panic!("save should succeed, got {:?}", other),
        }
        self
    }

    pub fn then_save_should_fail(self) -> Self {
        match &self.save_result {
            Some(Err(PersistenceError::Store(_))) => {}
            other => panic!("save should fail with store error, got {:?}", other),
        }
        self
    }

    pub fn then_report_should_be(self, loaded: usize, abandoned: usize) -> Self {
        assert_eq!(self.report, Some(LoadReport { loaded, abandoned }));
        self
    }

    /// Renders tile contents as `kind, container[kind, kind]` in tile order.
    pub fn then_tile_should_hold(self, position: Position, expected: &str) -> Self {
        let tile = self.world.tile_at(position).unwrap();
        let rendered: Vec<String> = tile
            .items
            .iter()
            .map(|id| render(&self.world, *id))
            .collect();
        assert_eq!(rendered.join(", "), expected, "tile {}", position);
        self
    }

    pub fn then_item_should<F>(self, name: &str, check: F) -> Self
    where
        F: FnOnce(&Item),
    {
        let id = self.item(name);
        check(self.world.inventory.get_item(id).unwrap());
        self
    }

    /// Checks the first item of `kind` found on the tile, nested items
    /// included.
    pub fn then_item_at_should<F>(self, position: Position, kind: &str, check: F) -> Self
    where
        F: FnOnce(&Item, &World, &DecayTimeline),
    {
        let item = self.find_item(position, kind).unwrap_or_else(|| {
            panic!("no {} at {}", kind, position);
        });
        check(item, &self.world, &self.decay);
        self
    }

    pub fn then_house_should<F>(self, id: u32, check: F) -> Self
    where
        F: FnOnce(&House, &World),
    {
        let house = self.world.housing.get_house(HouseId(id)).unwrap();
        check(house, &self.world);
        self
    }

    pub fn then_world_should<F>(self, check: F) -> Self
    where
        F: FnOnce(&World),
    {
        check(&self.world);
        self
    }

    pub fn then_stored_tiles_should_be(self, count: usize) -> Self {
        assert_eq!(self.stored_tiles().len(), count);
        self
    }

    pub fn then_stored_value_should_be<T>(self, sql: &str, expected: T) -> Self
    where
        T: rusqlite::types::FromSql + PartialEq + std::fmt::Debug,
    {
        let value: T = self
            .storage
            .connection()
            .query_row(sql, [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, expected, "{}", sql);
        self
    }

    pub fn stored_tiles(&self) -> Vec<(u32, Vec<u8>)> {
        self.storage
            .find_all(
                "select house_id, data from tile_store order by rowid",
                |row| Ok::<_, rusqlite::Error>((row.get(0)?, row.get(1)?)),
            )
            .unwrap()
    }

    fn find_item(&self, position: Position, kind: &str) -> Option<&Item> {
        let tile = self.world.tile_at(position)?;
        tile.items
            .iter()
            .flat_map(|id| self.world.inventory.descendants(*id))
            .filter_map(|id| self.world.inventory.items.get(&id))
            .find(|item| item.kind.name == kind)
    }
}

fn place_fixture(world: &mut World, fixture: &Fixture) -> ItemId {
    let kind = world.known.items.find(&fixture.kind).unwrap();
    let id = world.place_item(fixture.position, &kind).unwrap();
    if let ItemVariant::Door { door_id, .. } = &mut world.inventory.get_item_mut(id).unwrap().variant
    {
        *door_id = fixture.door_id;
    }
    id
}

fn render(world: &World, id: ItemId) -> String {
    let item = world.inventory.get_item(id).unwrap();
    match &item.variant {
        ItemVariant::Container { items } => {
            let children: Vec<String> = items.iter().map(|child| render(world, *child)).collect();
            format!("{}[{}]", item.kind.name, children.join(", "))
        }
        _ => item.kind.name.clone(),
    }
}
