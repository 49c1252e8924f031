use serde::{Deserialize, Serialize};

use super::node::{StageFeatures, StageIcon, StageNode, StageType, VersionThreshold};
use super::{HEADER_SIZE, RECORD_SIZE};
use crate::cursor::{BinaryCursor, ByteOrder};
use crate::error::{malformed_catalog, CoreResult};

/// One row of the catalog source table, in stream (pre-order) position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub stage_name: String,
    pub data_id: i16,
    pub page_id: i16,
    pub stage_type: StageType,
    pub depth: u8,
    pub icon: StageIcon,
    pub collect_item_num: u8,
    pub challenge_time: u16,
    pub version_threshold: VersionThreshold,
    pub features: StageFeatures,
}

impl CatalogRecord {
    pub fn from_node(node: &StageNode) -> Self {
        Self {
            stage_name: node.name.clone(),
            data_id: node.data_id,
            page_id: node.page_id,
            stage_type: node.stage_type,
            depth: node.depth,
            icon: node.icon().unwrap_or_default(),
            collect_item_num: node.collect_item_num,
            challenge_time: node.challenge_time,
            version_threshold: node.version_threshold,
            features: node.features,
        }
    }
}

/// Packs records into the binary catalog stream. The string pool holds every
/// distinct stage name once, sorted.
pub fn encode_catalog(records: &[CatalogRecord]) -> CoreResult<Vec<u8>> {
    let mut strings: Vec<&str> = records
        .iter()
        .map(|record| record.stage_name.as_str())
        .collect();
    strings.sort_unstable();
    strings.dedup();

    let mut pool_len = 0usize;
    for name in &strings {
        if name.len() > u16::MAX as usize {
            return Err(malformed_catalog(format!("stage name '{name}' is too long")));
        }
        pool_len += 2 + name.len();
    }
    for (index, record) in records.iter().enumerate() {
        if !(1..=0xF).contains(&record.depth) {
            return Err(malformed_catalog(format!(
                "record {index} has depth {}, expected 1..=15",
                record.depth
            )));
        }
        if record.collect_item_num > 0xF {
            return Err(malformed_catalog(format!(
                "record {index} has {} collectibles, at most 15 fit",
                record.collect_item_num
            )));
        }
    }
    if strings.len() > u16::MAX as usize + 1 {
        return Err(malformed_catalog("too many distinct stage names"));
    }

    let total_len = HEADER_SIZE + pool_len + records.len() * RECORD_SIZE;
    let header_word = |value: usize| {
        u32::try_from(value).map_err(|_| malformed_catalog("catalog exceeds 4 GiB"))
    };
    let mut cursor = BinaryCursor::new(vec![0u8; total_len], ByteOrder::LittleEndian);
    cursor.put_u32(header_word(records.len())?)?;
    cursor.put_u32(header_word(strings.len())?)?;
    cursor.put_u32(header_word(pool_len)?)?;
    cursor.put_u32(header_word(total_len)?)?;
    for name in &strings {
        cursor.put_string(name)?;
    }

    for record in records {
        // Present by construction of `strings`.
        let name_index = strings
            .binary_search(&record.stage_name.as_str())
            .map_err(|_| malformed_catalog("string pool lost a stage name"))?;
        cursor.put_u16(name_index as u16)?;
        cursor.put_i16(record.data_id)?;
        cursor.put_i16(record.page_id)?;
        cursor.put_i8(record.stage_type.code())?;
        cursor.put_u8((record.icon.id() << 4) | record.depth)?;
        cursor.put_u8((record.collect_item_num << 4) | record.version_threshold.code())?;
        cursor.put_u8(record.features.bits())?;
        cursor.put_u16(record.challenge_time)?;
    }

    Ok(cursor.into_inner())
}
