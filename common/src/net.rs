use anyhow::Result;
use bytes::Bytes;
use quinn::Connection;

#[cfg(all(feature = "json", not(feature = "bincode")))]
use serde::{Serialize, de::DeserializeOwned};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use crate::constants::MAX_MESSAGE_BYTES;

// ============================================================================
// Message Channel Abstraction
// ============================================================================

// Two delivery classes over one QUIC connection:
//  - reliable: one unidirectional stream per message. Streams are unordered
//    relative to each other, which the protocol tolerates. Used for Init and
//    GameOver, which must arrive.
//  - unreliable: QUIC datagrams. Used for Input and State, where only the
//    latest message matters and a lost one is superseded anyway.
pub struct MessageChannel<'a> {
    connection: &'a Connection,
}

impl<'a> MessageChannel<'a> {
    #[must_use]
    pub const fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }

    #[cfg(all(feature = "json", not(feature = "bincode")))]
    fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(msg)?)
    }

    #[cfg(feature = "bincode")]
    fn encode<T: Encode>(msg: &T) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(msg, bincode::config::standard())?)
    }

    #[cfg(all(feature = "json", not(feature = "bincode")))]
    fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(data)?)
    }

    #[cfg(feature = "bincode")]
    fn decode<T: Decode<()>>(data: &[u8]) -> Result<T> {
        Ok(bincode::decode_from_slice(data, bincode::config::standard())?.0)
    }

    #[cfg(all(feature = "json", not(feature = "bincode")))]
    pub async fn send_reliable<T: Serialize + Send + Sync>(&self, msg: &T) -> Result<()> {
        let mut stream = self.connection.open_uni().await?;
        stream.write_all(&Self::encode(msg)?).await?;
        stream.finish()?;
        Ok(())
    }

    #[cfg(feature = "bincode")]
    pub async fn send_reliable<T: Encode + Send + Sync>(&self, msg: &T) -> Result<()> {
        let mut stream = self.connection.open_uni().await?;
        stream.write_all(&Self::encode(msg)?).await?;
        stream.finish()?;
        Ok(())
    }

    #[cfg(all(feature = "json", not(feature = "bincode")))]
    pub async fn recv_reliable<T: DeserializeOwned + Send>(&self) -> Result<T> {
        let mut stream = self.connection.accept_uni().await?;
        let data = stream.read_to_end(MAX_MESSAGE_BYTES).await?;
        Self::decode(&data)
    }

    #[cfg(feature = "bincode")]
    pub async fn recv_reliable<T: Decode<()> + Send>(&self) -> Result<T> {
        let mut stream = self.connection.accept_uni().await?;
        let data = stream.read_to_end(MAX_MESSAGE_BYTES).await?;
        Self::decode(&data)
    }

    #[cfg(all(feature = "json", not(feature = "bincode")))]
    pub fn send_unreliable<T: Serialize>(&self, msg: &T) -> Result<()> {
        self.connection.send_datagram(Bytes::from(Self::encode(msg)?))?;
        Ok(())
    }

    #[cfg(feature = "bincode")]
    pub fn send_unreliable<T: Encode>(&self, msg: &T) -> Result<()> {
        self.connection.send_datagram(Bytes::from(Self::encode(msg)?))?;
        Ok(())
    }

    #[cfg(all(feature = "json", not(feature = "bincode")))]
    pub async fn recv_unreliable<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self.connection.read_datagram().await?;
        Self::decode(&data)
    }

    #[cfg(feature = "bincode")]
    pub async fn recv_unreliable<T: Decode<()>>(&self) -> Result<T> {
        let data = self.connection.read_datagram().await?;
        Self::decode(&data)
    }
}
