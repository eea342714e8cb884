//! Borsh-compatible payload encoding for bridge instructions.
//!
//! The on-chain bridge program deserializes its instruction payloads with
//! borsh, so the layout here must match it byte for byte: little-endian
//! integers, 4-byte LE length prefixes for strings and sequences, no
//! padding and no implicit alignment.
//!
//! Rather than scattering serialization across call sites, each payload is
//! described by a declarative [`Schema`] (an ordered field list) and
//! encoded/decoded generically. The per-opcode schemas live in one place
//! and are testable as data.

use crate::error::BridgeError;

// ---------------------------------------------------------------------------
// Schema model
// ---------------------------------------------------------------------------

/// Element type of a length-prefixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    U64,
    U128,
    Str,
}

/// The wire type of a single payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 8 bytes, little-endian.
    U64,
    /// 16 bytes, little-endian.
    U128,
    /// u32 LE byte length, then that many UTF-8 bytes.
    Str,
    /// u32 LE element count, then each element encoded back to back.
    Seq(Primitive),
}

/// A dynamically-typed payload field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U64(u64),
    U128(u128),
    Str(String),
    Seq(Vec<Value>),
}

impl Value {
    fn kind_name(&self) -> &'static str {
        match self {
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
        }
    }
}

/// An ordered field list describing one payload layout.
///
/// Field order is part of the wire contract; reordering fields changes the
/// encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(&'static str, FieldKind)>,
}

impl Schema {
    pub fn new(fields: &[(&'static str, FieldKind)]) -> Self {
        Schema {
            fields: fields.to_vec(),
        }
    }

    pub fn fields(&self) -> &[(&'static str, FieldKind)] {
        &self.fields
    }
}

// ---------------------------------------------------------------------------
// Generic encode / decode
// ---------------------------------------------------------------------------

/// Encode `values` according to `schema`.
///
/// Every declared field must be present (matched by name) with the declared
/// kind; missing, extra, or mistyped fields fail with
/// [`BridgeError::SchemaMismatch`]. There are no implicit defaults.
pub fn encode(schema: &Schema, values: &[(&str, Value)]) -> Result<Vec<u8>, BridgeError> {
    if values.len() != schema.fields.len() {
        return Err(BridgeError::SchemaMismatch(format!(
            "expected {} field(s), got {}",
            schema.fields.len(),
            values.len()
        )));
    }

    let mut out = Vec::new();
    for (name, kind) in &schema.fields {
        let value = values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| BridgeError::SchemaMismatch(format!("missing field `{name}`")))?;
        encode_field(name, *kind, value, &mut out)?;
    }

    Ok(out)
}

fn encode_field(
    name: &str,
    kind: FieldKind,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), BridgeError> {
    match (kind, value) {
        (FieldKind::U64, Value::U64(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldKind::U128, Value::U128(v)) => out.extend_from_slice(&v.to_le_bytes()),
        (FieldKind::Str, Value::Str(s)) => encode_str(name, s, out)?,
        (FieldKind::Seq(prim), Value::Seq(items)) => {
            let len = u32::try_from(items.len()).map_err(|_| {
                BridgeError::SchemaMismatch(format!("field `{name}`: sequence too long"))
            })?;
            out.extend_from_slice(&len.to_le_bytes());
            for item in items {
                match (prim, item) {
                    (Primitive::U64, Value::U64(v)) => out.extend_from_slice(&v.to_le_bytes()),
                    (Primitive::U128, Value::U128(v)) => out.extend_from_slice(&v.to_le_bytes()),
                    (Primitive::Str, Value::Str(s)) => encode_str(name, s, out)?,
                    _ => {
                        return Err(BridgeError::SchemaMismatch(format!(
                            "field `{name}`: sequence element is {}, schema says otherwise",
                            item.kind_name()
                        )))
                    }
                }
            }
        }
        _ => {
            return Err(BridgeError::SchemaMismatch(format!(
                "field `{name}`: got {}, schema disagrees",
                value.kind_name()
            )))
        }
    }
    Ok(())
}

fn encode_str(name: &str, s: &str, out: &mut Vec<u8>) -> Result<(), BridgeError> {
    let len = u32::try_from(s.len())
        .map_err(|_| BridgeError::SchemaMismatch(format!("field `{name}`: string too long")))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Decode `bytes` according to `schema`, returning the fields in schema
/// order. Truncated input or trailing bytes fail with
/// [`BridgeError::SchemaMismatch`].
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Vec<(&'static str, Value)>, BridgeError> {
    let mut cursor = Cursor { bytes, pos: 0 };

    let mut fields = Vec::with_capacity(schema.fields.len());
    for (name, kind) in &schema.fields {
        let value = decode_field(name, *kind, &mut cursor)?;
        fields.push((*name, value));
    }

    let rest = cursor.bytes.len() - cursor.pos;
    if rest != 0 {
        return Err(BridgeError::SchemaMismatch(format!(
            "{rest} trailing byte(s) after last field"
        )));
    }

    Ok(fields)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize, name: &str) -> Result<&'a [u8], BridgeError> {
        if self.pos + n > self.bytes.len() {
            return Err(BridgeError::SchemaMismatch(format!(
                "unexpected end of payload while reading field `{name}`"
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, name: &str) -> Result<[u8; N], BridgeError> {
        let slice = self.take(N, name)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(slice);
        Ok(arr)
    }

    fn take_u32(&mut self, name: &str) -> Result<u32, BridgeError> {
        Ok(u32::from_le_bytes(self.take_array(name)?))
    }
}

fn decode_field(name: &str, kind: FieldKind, cursor: &mut Cursor) -> Result<Value, BridgeError> {
    match kind {
        FieldKind::U64 => Ok(Value::U64(u64::from_le_bytes(cursor.take_array(name)?))),
        FieldKind::U128 => Ok(Value::U128(u128::from_le_bytes(cursor.take_array(name)?))),
        FieldKind::Str => decode_str(name, cursor),
        FieldKind::Seq(prim) => {
            let count = cursor.take_u32(name)? as usize;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let item = match prim {
                    Primitive::U64 => Value::U64(u64::from_le_bytes(cursor.take_array(name)?)),
                    Primitive::U128 => Value::U128(u128::from_le_bytes(cursor.take_array(name)?)),
                    Primitive::Str => decode_str(name, cursor)?,
                };
                items.push(item);
            }
            Ok(Value::Seq(items))
        }
    }
}

fn decode_str(name: &str, cursor: &mut Cursor) -> Result<Value, BridgeError> {
    let len = cursor.take_u32(name)? as usize;
    let bytes = cursor.take(len, name)?;
    let s = String::from_utf8(bytes.to_vec()).map_err(|_| {
        BridgeError::SchemaMismatch(format!("invalid UTF-8 in field `{name}`"))
    })?;
    Ok(Value::Str(s))
}

// ---------------------------------------------------------------------------
// Typed payloads
// ---------------------------------------------------------------------------

/// TransferOut instruction payload.
///
/// `amount` is a u64 to match the width the on-chain program deserializes;
/// a u128 here would shift every later field and make the program reject
/// the instruction with a generic failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutData {
    pub amount: u64,
    pub token_address: String,
    pub chain_id: u64,
    pub recipient: String,
}

impl TransferOutData {
    pub fn schema() -> Schema {
        Schema::new(&[
            ("amount", FieldKind::U64),
            ("token_address", FieldKind::Str),
            ("chain_id", FieldKind::U64),
            ("recipient", FieldKind::Str),
        ])
    }

    pub fn encode(&self) -> Result<Vec<u8>, BridgeError> {
        encode(
            &Self::schema(),
            &[
                ("amount", Value::U64(self.amount)),
                ("token_address", Value::Str(self.token_address.clone())),
                ("chain_id", Value::U64(self.chain_id)),
                ("recipient", Value::Str(self.recipient.clone())),
            ],
        )
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, BridgeError> {
        let mut fields = decode(&Self::schema(), bytes)?.into_iter();
        Ok(TransferOutData {
            amount: expect_u64(fields.next())?,
            token_address: expect_str(fields.next())?,
            chain_id: expect_u64(fields.next())?,
            recipient: expect_str(fields.next())?,
        })
    }
}

/// TransferIn instruction payload: a vault-release nonce plus one amount
/// per pending transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInData {
    pub nonce: u64,
    pub amounts: Vec<u64>,
}

impl TransferInData {
    pub fn schema() -> Schema {
        Schema::new(&[
            ("nonce", FieldKind::U64),
            ("amounts", FieldKind::Seq(Primitive::U64)),
        ])
    }

    pub fn encode(&self) -> Result<Vec<u8>, BridgeError> {
        encode(
            &Self::schema(),
            &[
                ("nonce", Value::U64(self.nonce)),
                (
                    "amounts",
                    Value::Seq(self.amounts.iter().map(|a| Value::U64(*a)).collect()),
                ),
            ],
        )
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, BridgeError> {
        let mut fields = decode(&Self::schema(), bytes)?.into_iter();
        let nonce = expect_u64(fields.next())?;
        let amounts = match fields.next() {
            Some((_, Value::Seq(items))) => items
                .into_iter()
                .map(|item| match item {
                    Value::U64(v) => Ok(v),
                    other => Err(BridgeError::SchemaMismatch(format!(
                        "amounts element is {}, expected u64",
                        other.kind_name()
                    ))),
                })
                .collect::<Result<Vec<u64>, BridgeError>>()?,
            other => return Err(unexpected_field(other, "sequence")),
        };
        Ok(TransferInData { nonce, amounts })
    }
}

fn expect_u64(field: Option<(&'static str, Value)>) -> Result<u64, BridgeError> {
    match field {
        Some((_, Value::U64(v))) => Ok(v),
        other => Err(unexpected_field(other, "u64")),
    }
}

fn expect_str(field: Option<(&'static str, Value)>) -> Result<String, BridgeError> {
    match field {
        Some((_, Value::Str(s))) => Ok(s),
        other => Err(unexpected_field(other, "string")),
    }
}

fn unexpected_field(field: Option<(&'static str, Value)>, wanted: &str) -> BridgeError {
    match field {
        Some((name, value)) => BridgeError::SchemaMismatch(format!(
            "field `{name}` is {}, expected {wanted}",
            value.kind_name()
        )),
        None => BridgeError::SchemaMismatch("fewer fields than schema declares".into()),
    }
}
