mod create_item;
mod destroy_item;
mod insert_item;
mod transform_item;
