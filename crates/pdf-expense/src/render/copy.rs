//! Copying pages from a donor document
//!
//! Pages are rebuilt in the output with their inherited attributes resolved,
//! and every object they reference is copied once. References that lead to
//! other pages of the donor are dropped rather than dragging the whole donor
//! page tree along.

use super::OutputDocument;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copy every page of `source` to the end of `output`, in order.
/// Returns the number of pages copied.
pub fn copy_pages(output: &mut OutputDocument, source: &Document) -> Result<usize> {
    let page_ids: Vec<ObjectId> = source.get_pages().values().copied().collect();
    let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();

    // Reserve IDs first so annotations pointing back at their page resolve
    let reserved: Vec<ObjectId> = page_ids
        .iter()
        .map(|&id| {
            let new_id = output.document_mut().new_object_id();
            cache.insert(id, new_id);
            new_id
        })
        .collect();

    for (&page_id, &new_id) in page_ids.iter().zip(reserved.iter()) {
        let page = copy_page_dict(output.document_mut(), source, page_id, &mut cache)?;
        output.insert_page(new_id, page);
    }

    Ok(page_ids.len())
}

fn copy_page_dict(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let page_dict = source.get_dictionary(page_id)?;
    let mut copied = Dictionary::new();

    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        copied.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }

    for key in INHERITABLE {
        if copied.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_dict, key) {
            copied.set(key.to_vec(), copy_object_deep(output, source, value, cache)?);
        }
    }

    Ok(copied)
}

/// Walk up the page tree looking for an inheritable attribute
fn inherited_attribute<'a>(
    source: &'a Document,
    page_dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page_dict;
    // Bounded to survive malformed trees with parent cycles
    for _ in 0..64 {
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = source.get_dictionary(parent_id).ok()?;
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
    }
    None
}

/// Deep copy an object from source to output document, following references.
///
/// Uses a cache to avoid copying the same object multiple times. IDs are
/// reserved before recursing so reference cycles terminate.
fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let referenced = match source.get_object(*id) {
                Ok(referenced) => referenced,
                // Dangling references are legal and read as null
                Err(_) => return Ok(Object::Null),
            };
            if is_page_tree_node(referenced) {
                return Ok(Object::Null);
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Stream(Stream {
                dict: new_dict,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            }))
        }
        _ => Ok(obj.clone()),
    }
}

fn is_page_tree_node(obj: &Object) -> bool {
    let Ok(dict) = obj.as_dict() else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}
