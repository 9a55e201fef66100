/*!
 * Copyright (c) 2026 Ming Lyu, aka mingcheng
 *
 * This source code is licensed under the MIT License,
 * which is located in the LICENSE file in the source tree's root directory.
 *
 * File: message.rs
 * Author: mingcheng <mingcheng@apache.org>
 * File Created: 2026-10-12 10:31:07
 *
 * Modified By: mingcheng <mingcheng@apache.org>
 * Last Modified: 2026-10-15 09:48:30
 */

use lettre::message::Mailbox;

/// An address field as handed over by the composing side.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressField {
    /// Comma separated list, e.g. `"a@x.com, Bob <b@x.com>"`
    Text(String),
    List(Vec<String>),
    Mailboxes(Vec<Mailbox>),
}

impl AddressField {
    pub fn is_blank(&self) -> bool {
        match self {
            AddressField::Text(text) => text.trim().is_empty(),
            AddressField::List(items) => items.iter().all(|item| item.trim().is_empty()),
            AddressField::Mailboxes(mailboxes) => mailboxes.is_empty(),
        }
    }
}

impl From<&str> for AddressField {
    fn from(text: &str) -> Self {
        AddressField::Text(text.to_string())
    }
}

impl From<String> for AddressField {
    fn from(text: String) -> Self {
        AddressField::Text(text)
    }
}

impl From<Vec<String>> for AddressField {
    fn from(items: Vec<String>) -> Self {
        AddressField::List(items)
    }
}

impl From<Vec<&str>> for AddressField {
    fn from(items: Vec<&str>) -> Self {
        AddressField::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Mailbox>> for AddressField {
    fn from(mailboxes: Vec<Mailbox>) -> Self {
        AddressField::Mailboxes(mailboxes)
    }
}

impl From<Mailbox> for AddressField {
    fn from(mailbox: Mailbox) -> Self {
        AddressField::Mailboxes(vec![mailbox])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A composed message, ready to be handed to a delivery method.
///
/// Delivery methods only read it, except for the `Return-Path` and `Reply-To`
/// headers which [`SendgridDelivery`](crate::sendgrid_delivery::SendgridDelivery)
/// fills in before building its request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundMessage {
    pub from: Option<AddressField>,
    pub to: Option<AddressField>,
    pub bcc: Option<AddressField>,
    pub reply_to: Option<AddressField>,
    pub subject: Option<String>,
    pub text_part: Option<String>,
    pub html_part: Option<String>,
    pub headers: Vec<HeaderField>,
}

impl OutboundMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(|field| field.value.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Appends a header, keeping any existing field with the same name.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push(HeaderField::new(name, value));
    }

    /// Replaces the first header named `name` in place and drops any later
    /// duplicates, or appends a new one.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
        {
            Some(index) => {
                self.headers[index].value = value;
                let mut position = 0;
                self.headers.retain(|field| {
                    let keep = position <= index || !field.name.eq_ignore_ascii_case(name);
                    position += 1;
                    keep
                });
            }
            None => self.headers.push(HeaderField::new(name, value)),
        }
    }

    /// True when neither body part carries any content.
    pub fn has_blank_body(&self) -> bool {
        is_blank(self.text_part.as_deref()) && is_blank(self.html_part.as_deref())
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}
