use crate::feedback::PacketError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// width of the zero padded destination field
pub const DST_LENGTH: usize = 5;
/// width of the protocol field
pub const PROT_LENGTH: usize = 1;
pub const HEADER_LENGTH: usize = DST_LENGTH + PROT_LENGTH;
/// largest address that fits in the destination field
pub const MAX_ADDRESS: u32 = 99_999;

/// Address of a host or router. Always fits in [`DST_LENGTH`] decimal digits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Address(u32);

impl Address {
    pub fn new(value: u32) -> Result<Self, PacketError> {
        if value > MAX_ADDRESS {
            return Err(PacketError::AddressOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Address {
    type Error = PacketError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for u32 {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Address {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u32>()
            .map_err(|_| PacketError::InvalidAddress(s.to_string()))?;
        Self::new(value)
    }
}

/// Upper layer protocol carried by a packet
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Protocol {
    Data,
    /// routing table advertisements
    Control,
}

impl Protocol {
    pub fn digit(self) -> u8 {
        match self {
            Protocol::Data => b'1',
            Protocol::Control => b'2',
        }
    }

    pub fn from_digit(digit: u8) -> Result<Self, PacketError> {
        match digit {
            b'1' => Ok(Protocol::Data),
            b'2' => Ok(Protocol::Control),
            other => Err(PacketError::UnknownProtocol(other as char)),
        }
    }
}

/// A network layer packet.
///
/// On the wire a packet is `[destination, 5 zero padded digits][protocol digit][payload]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Packet {
    pub dst: Address,
    pub protocol: Protocol,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn data(dst: Address, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            dst,
            protocol: Protocol::Data,
            payload: payload.into(),
        }
    }

    pub fn control(dst: Address, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            dst,
            protocol: Protocol::Control,
            payload: payload.into(),
        }
    }

    /// convert the packet to a byte string for transmission over links
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LENGTH + self.payload.len());
        bytes.extend_from_slice(format!("{:0width$}", self.dst.get(), width = DST_LENGTH).as_bytes());
        bytes.push(self.protocol.digit());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// extract a packet from a byte string
    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() < HEADER_LENGTH {
            return Err(PacketError::Malformed { len: bytes.len() });
        }
        let (dst, rest) = bytes.split_at(DST_LENGTH);
        if !dst.iter().all(u8::is_ascii_digit) {
            return Err(PacketError::InvalidAddress(
                String::from_utf8_lossy(dst).into_owned(),
            ));
        }
        // five ascii digits always fit, leading zeros are dropped by the parse
        let dst = dst
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
        let protocol = Protocol::from_digit(rest[0])?;
        Ok(Self {
            dst: Address::new(dst)?,
            protocol,
            payload: rest[PROT_LENGTH..].to_vec(),
        })
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.encode()))
    }
}
