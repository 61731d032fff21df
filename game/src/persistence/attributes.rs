use crate::inventory::{ItemAttributes, ItemKey, ItemVariant};
use crate::model::Position;
use crate::persistence::{FormatError, PropStream, PropWriteStream};

pub const ATTR_END: u8 = 0;
pub const ATTR_ACTION_ID: u8 = 4;
pub const ATTR_UNIQUE_ID: u8 = 5;
pub const ATTR_TEXT: u8 = 6;
pub const ATTR_DESC: u8 = 7;
pub const ATTR_TELE_DEST: u8 = 8;
pub const ATTR_HOUSEDOORID: u8 = 14;
pub const ATTR_COUNT: u8 = 15;
pub const ATTR_DURATION: u8 = 16;
pub const ATTR_DECAYING_STATE: u8 = 17;
pub const ATTR_WRITTENDATE: u8 = 18;
pub const ATTR_WRITTENBY: u8 = 19;
pub const ATTR_SLEEPERGUID: u8 = 20;
pub const ATTR_SLEEPSTART: u8 = 21;
pub const ATTR_CHARGES: u8 = 22;
pub const ATTR_CONTAINER_ITEMS: u8 = 23;
pub const ATTR_NAME: u8 = 24;
pub const ATTR_OWNER: u8 = 30;

/// How an attribute blob ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributesEnd {
    Terminated,
    /// Container marker with the declared number of children that follow.
    ContainerItems(u32),
}

/// Writes every set attribute in ascending tag order. Neither the container
/// marker nor the terminator is written here.
pub fn serialize_attributes(
    stream: &mut PropWriteStream,
    attributes: &ItemAttributes,
    variant: &ItemVariant,
) {
    if let Some(action_id) = attributes.action_id {
        stream.write(ATTR_ACTION_ID);
        stream.write(action_id);
    }
    if let Some(unique_id) = attributes.unique_id {
        stream.write(ATTR_UNIQUE_ID);
        stream.write(unique_id);
    }
    if let Some(text) = &attributes.text {
        stream.write(ATTR_TEXT);
        stream.write_string(text);
    }
    if let Some(description) = &attributes.description {
        stream.write(ATTR_DESC);
        stream.write_string(description);
    }
    if let ItemVariant::Teleport {
        destination: Some(destination),
    } = variant
    {
        stream.write(ATTR_TELE_DEST);
        stream.write(destination.x);
        stream.write(destination.y);
        stream.write(destination.z);
    }
    if let ItemVariant::Door { door_id, .. } = variant {
        if *door_id != 0 {
            stream.write(ATTR_HOUSEDOORID);
            stream.write(*door_id);
        }
    }
    if let Some(count) = attributes.count {
        stream.write(ATTR_COUNT);
        stream.write(count);
    }
    if let Some(duration) = attributes.duration {
        stream.write(ATTR_DURATION);
        stream.write(duration);
    }
    if let Some(state) = attributes.decaying_state {
        stream.write(ATTR_DECAYING_STATE);
        stream.write(state);
    }
    if let Some(date) = attributes.written_date {
        stream.write(ATTR_WRITTENDATE);
        stream.write(date);
    }
    if let Some(writer) = &attributes.written_by {
        stream.write(ATTR_WRITTENBY);
        stream.write_string(writer);
    }
    if let ItemVariant::Bed {
        sleeper,
        sleep_start,
    } = variant
    {
        if *sleeper != 0 {
            stream.write(ATTR_SLEEPERGUID);
            stream.write(*sleeper);
        }
        if *sleep_start != 0 {
            stream.write(ATTR_SLEEPSTART);
            stream.write(*sleep_start);
        }
    }
    if let Some(charges) = attributes.charges {
        stream.write(ATTR_CHARGES);
        stream.write(charges);
    }
    if let Some(name) = &attributes.name {
        stream.write(ATTR_NAME);
        stream.write_string(name);
    }
    if let Some(owner) = attributes.owner {
        stream.write(ATTR_OWNER);
        stream.write(owner);
    }
}

/// Reads attribute entries until the terminator or the container marker.
///
/// Entries are applied as they are read, so callers that must not see a
/// half-applied blob pass scratch copies.
pub fn unserialize_attributes(
    stream: &mut PropStream,
    attributes: &mut ItemAttributes,
    variant: &mut ItemVariant,
    key: ItemKey,
) -> Result<AttributesEnd, FormatError> {
    loop {
        let tag: u8 = stream.read().ok_or(FormatError::UnexpectedEnd {
            field: "attribute tag",
        })?;
        match tag {
            ATTR_END => return Ok(AttributesEnd::Terminated),
            ATTR_CONTAINER_ITEMS => {
                if !matches!(variant, ItemVariant::Container { .. }) {
                    return Err(FormatError::UnexpectedAttribute { tag, key });
                }
                let count = read(stream, "container item count")?;
                return Ok(AttributesEnd::ContainerItems(count));
            }
            ATTR_ACTION_ID => attributes.action_id = Some(read(stream, "action id")?),
            ATTR_UNIQUE_ID => attributes.unique_id = Some(read(stream, "unique id")?),
            ATTR_TEXT => attributes.text = Some(read_string(stream, tag)?),
            ATTR_DESC => attributes.description = Some(read_string(stream, tag)?),
            ATTR_TELE_DEST => match variant {
                ItemVariant::Teleport { destination } => {
                    let x = read(stream, "teleport destination")?;
                    let y = read(stream, "teleport destination")?;
                    let z = read(stream, "teleport destination")?;
                    *destination = Some(Position::new(x, y, z));
                }
                _ => return Err(FormatError::UnexpectedAttribute { tag, key }),
            },
            ATTR_HOUSEDOORID => match variant {
                ItemVariant::Door { door_id, .. } => *door_id = read(stream, "house door id")?,
                _ => return Err(FormatError::UnexpectedAttribute { tag, key }),
            },
            ATTR_COUNT => attributes.count = Some(read(stream, "count")?),
            ATTR_DURATION => attributes.duration = Some(read(stream, "duration")?),
            ATTR_DECAYING_STATE => {
                attributes.decaying_state = Some(read(stream, "decaying state")?)
            }
            ATTR_WRITTENDATE => attributes.written_date = Some(read(stream, "written date")?),
            ATTR_WRITTENBY => attributes.written_by = Some(read_string(stream, tag)?),
            ATTR_SLEEPERGUID => match variant {
                ItemVariant::Bed { sleeper, .. } => *sleeper = read(stream, "sleeper")?,
                _ => return Err(FormatError::UnexpectedAttribute { tag, key }),
            },
            ATTR_SLEEPSTART => match variant {
                ItemVariant::Bed { sleep_start, .. } => *sleep_start = read(stream, "sleep start")?,
                _ => return Err(FormatError::UnexpectedAttribute { tag, key }),
            },
            ATTR_CHARGES => attributes.charges = Some(read(stream, "charges")?),
            ATTR_NAME => attributes.name = Some(read_string(stream, tag)?),
            ATTR_OWNER => attributes.owner = Some(read(stream, "owner")?),
            _ => return Err(FormatError::UnknownAttribute { tag }),
        }
    }
}

#[inline]
fn read<T: crate::persistence::Primitive>(
    stream: &mut PropStream,
    field: &'static str,
) -> Result<T, FormatError> {
    stream.read().ok_or(FormatError::UnexpectedEnd { field })
}

#[inline]
fn read_string(stream: &mut PropStream, tag: u8) -> Result<String, FormatError> {
    stream
        .read_string()
        .ok_or(FormatError::InvalidString { tag })
}
