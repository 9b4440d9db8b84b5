//! Transaction essence serialization and signing.
//!
//! Layout (little endian):
//!
//! ```text
//! essence  := u8 type(0) | u16 n | input*n | u16 m | output*m | u32 len | payload?
//! input    := u8 type(0) | [32] transaction id | u16 output index
//! output   := u8 type(0) | u8 address type(0) | [32] address | u64 amount
//! payload  := u32 type(2) | u16 len | index | u32 len | data
//! ```

use crate::errors::LedgerError;
use crate::types::Indexation;
use byteorder::{ByteOrder, LittleEndian};
use ed25519_dalek::{Keypair, Signer};
use wallet_core::types::{Blake2b256, Ed25519Address, ADDRESS_VERSION_ED25519, MAX_INDEX_BYTES};

use blake2::Digest;

/// Length of a transaction id in bytes.
pub const TRANSACTION_ID_BYTES: usize = 32;

/// Maximum number of inputs or outputs in one essence.
pub const MAX_IO_COUNT: usize = 127;

const ESSENCE_TYPE: u8 = 0;
const UTXO_INPUT_TYPE: u8 = 0;
const SIG_LOCKED_SINGLE_OUTPUT_TYPE: u8 = 0;
const INDEXATION_PAYLOAD_TYPE: u32 = 2;

/// A reference to an unspent output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UtxoInput {
    /// The transaction that created the output
    pub transaction_id: [u8; TRANSACTION_ID_BYTES],
    /// The output's position in that transaction
    pub output_index: u16,
}

impl UtxoInput {
    fn write(&self, buf: &mut Vec<u8>) {
        buf.push(UTXO_INPUT_TYPE);
        buf.extend_from_slice(&self.transaction_id);
        put_u16(buf, self.output_index);
    }

    fn to_json(self) -> serde_json::Value {
        serde_json::json!({
            "type": UTXO_INPUT_TYPE,
            "transactionId": hex::encode(self.transaction_id),
            "transactionOutputIndex": self.output_index,
        })
    }
}

/// An output locked to an Ed25519 address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureLockedOutput {
    /// The receiving address
    pub address: Ed25519Address,
    /// The amount in base units
    pub amount: u64,
}

impl SignatureLockedOutput {
    fn write(&self, buf: &mut Vec<u8>) {
        buf.push(SIG_LOCKED_SINGLE_OUTPUT_TYPE);
        buf.push(ADDRESS_VERSION_ED25519);
        buf.extend_from_slice(self.address.as_bytes());
        put_u64(buf, self.amount);
    }

    fn to_json(self) -> serde_json::Value {
        serde_json::json!({
            "type": SIG_LOCKED_SINGLE_OUTPUT_TYPE,
            "address": {
                "type": ADDRESS_VERSION_ED25519,
                "address": self.address.to_hex(),
            },
            "amount": self.amount,
        })
    }
}

/// The signed part of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Essence {
    inputs: Vec<UtxoInput>,
    outputs: Vec<SignatureLockedOutput>,
    payload: Option<Indexation>,
}

impl Essence {
    /// Builds an essence, sorting inputs and outputs by their serialized form.
    pub fn new(
        mut inputs: Vec<UtxoInput>,
        mut outputs: Vec<SignatureLockedOutput>,
        payload: Option<Indexation>,
    ) -> Result<Self, LedgerError> {
        if inputs.is_empty() || inputs.len() > MAX_IO_COUNT {
            return Err(LedgerError::Transaction(format!(
                "input count {} out of range",
                inputs.len()
            )));
        }
        if outputs.is_empty() || outputs.len() > MAX_IO_COUNT {
            return Err(LedgerError::Transaction(format!(
                "output count {} out of range",
                outputs.len()
            )));
        }
        if let Some(indexation) = &payload {
            let len = indexation.index.len();
            if len == 0 || len > MAX_INDEX_BYTES {
                return Err(LedgerError::Transaction(format!(
                    "indexation index length {} out of range",
                    len
                )));
            }
        }

        inputs.sort_by_cached_key(|input| {
            let mut buf = Vec::new();
            input.write(&mut buf);
            buf
        });
        outputs.sort_by_cached_key(|output| {
            let mut buf = Vec::new();
            output.write(&mut buf);
            buf
        });

        Ok(Self {
            inputs,
            outputs,
            payload,
        })
    }

    /// Returns the inputs in serialization order.
    pub fn inputs(&self) -> &[UtxoInput] {
        &self.inputs
    }

    /// Returns the outputs in serialization order.
    pub fn outputs(&self) -> &[SignatureLockedOutput] {
        &self.outputs
    }

    /// Serializes the essence into its binary form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(ESSENCE_TYPE);

        // Counts are bounded by MAX_IO_COUNT in `new`
        put_u16(&mut buf, self.inputs.len() as u16);
        for input in &self.inputs {
            input.write(&mut buf);
        }
        put_u16(&mut buf, self.outputs.len() as u16);
        for output in &self.outputs {
            output.write(&mut buf);
        }

        match &self.payload {
            Some(indexation) => {
                let payload = serialize_indexation(indexation);
                put_u32(&mut buf, payload.len() as u32);
                buf.extend_from_slice(&payload);
            }
            None => put_u32(&mut buf, 0),
        }

        buf
    }

    /// Returns the BLAKE2b-256 hash that gets signed.
    pub fn hash(&self) -> [u8; 32] {
        let digest = Blake2b256::digest(self.serialize());
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        hash
    }

    /// Signs the essence and returns the full transaction payload as JSON.
    ///
    /// Every input must belong to the address of `signer`: the first input is
    /// unlocked by the signature, the others reference it.
    pub fn sign(&self, signer: &Keypair) -> serde_json::Value {
        let signature = signer.sign(&self.hash());

        let mut unlock_blocks = vec![serde_json::json!({
            "type": 0,
            "signature": {
                "type": 0,
                "publicKey": hex::encode(signer.public.as_bytes()),
                "signature": hex::encode(signature.to_bytes()),
            },
        })];
        for _ in 1..self.inputs.len() {
            unlock_blocks.push(serde_json::json!({ "type": 1, "reference": 0 }));
        }

        serde_json::json!({
            "type": 0,
            "essence": {
                "type": ESSENCE_TYPE,
                "inputs": self.inputs.iter().map(|input| input.to_json()).collect::<Vec<_>>(),
                "outputs": self.outputs.iter().map(|output| output.to_json()).collect::<Vec<_>>(),
                "payload": self.payload.as_ref().map(Indexation::to_json),
            },
            "unlockBlocks": unlock_blocks,
        })
    }
}

fn serialize_indexation(indexation: &Indexation) -> Vec<u8> {
    let mut buf = Vec::new();
    put_u32(&mut buf, INDEXATION_PAYLOAD_TYPE);
    put_u16(&mut buf, indexation.index.len() as u16);
    buf.extend_from_slice(&indexation.index);
    put_u32(&mut buf, indexation.data.len() as u32);
    buf.extend_from_slice(&indexation.data);
    buf
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    let mut bytes = [0u8; 2];
    LittleEndian::write_u16(&mut bytes, value);
    buf.extend_from_slice(&bytes);
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    let mut bytes = [0u8; 4];
    LittleEndian::write_u32(&mut bytes, value);
    buf.extend_from_slice(&bytes);
}

fn put_u64(buf: &mut Vec<u8>, value: u64) {
    let mut bytes = [0u8; 8];
    LittleEndian::write_u64(&mut bytes, value);
    buf.extend_from_slice(&bytes);
}
