/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: address.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-12 11:15:42
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-14 16:02:18
 */

use crate::error::ValidationError;
use crate::message::AddressField;
use lettre::message::Mailbox;

/// Resolves an address field into mailboxes, keeping input order and duplicates.
/// Blank entries are skipped.
pub fn mailboxes(field: &AddressField) -> Result<Vec<Mailbox>, ValidationError> {
    match field {
        AddressField::Text(text) => parse_all(split_list(text)),
        AddressField::List(items) => parse_all(items.iter().map(String::as_str)),
        AddressField::Mailboxes(mailboxes) => Ok(mailboxes.clone()),
    }
}

/// Same as [`mailboxes`], keeping only the bare address of each entry.
pub fn bare_addresses(field: &AddressField) -> Result<Vec<String>, ValidationError> {
    Ok(mailboxes(field)?.iter().map(bare_address).collect())
}

/// Resolves a field that must name exactly one mailbox.
pub fn single_mailbox(field: &AddressField) -> Result<Mailbox, ValidationError> {
    let mut found = mailboxes(field)?;
    match found.len() {
        1 => Ok(found.remove(0)),
        count => Err(ValidationError::AmbiguousSender(count)),
    }
}

pub fn bare_address(mailbox: &Mailbox) -> String {
    mailbox.email.to_string()
}

/// Display name of a mailbox, if it has a non-empty one.
pub fn display_name(mailbox: &Mailbox) -> Option<String> {
    mailbox
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn parse_all<'a>(items: impl Iterator<Item = &'a str>) -> Result<Vec<Mailbox>, ValidationError> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<Mailbox>()
                .map_err(|_| ValidationError::InvalidAddress(item.to_string()))
        })
        .collect()
}

// Commas inside a quoted display name do not separate entries.
fn split_list(text: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (index, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts.into_iter()
}
