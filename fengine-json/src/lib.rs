//! fengine-json contains the configuration and status schemas used by the
//! fengine pipeline and by external controllers. The same types describe the
//! on-disk JSON configuration file consumed by the `fengine` binary.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// Input source selected for a lane.
///
/// Each of the 12 input lanes can be switched independently between the live
/// sample stream, one of the internal digital noise generators, constant
/// zeros, or a ramp counter.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// Live samples from the external capture path.
    #[default]
    Adc,
    /// Internal digital noise generator.
    Noise,
    /// Constant zeros.
    Zero,
    /// Ramp counter (wraps at the 8-bit sample range).
    Counter,
}

/// Noise generator settings.
///
/// Two independent seeded generators are shared between the lanes, so that
/// several lanes can be fed with an identical noise stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NoiseConfig {
    /// Seeds for the two noise generators.
    pub seeds: [u64; 2],
    /// Generator index (0 or 1) feeding each lane when that lane selects
    /// the noise source.
    pub assignments: Vec<u8>,
}

/// Test vector generator settings for one lane.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TvgLane {
    /// Lane to which the test vectors apply.
    pub lane: usize,
    /// Per-channel real parts, as raw 4-bit two's-complement codes in
    /// [-7, 7]. Must contain one entry per frequency channel.
    pub real: Vec<i8>,
    /// Per-channel imaginary parts, same format as `real`.
    pub imag: Vec<i8>,
}

/// Autocorrelator settings.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AutocorrConfig {
    /// Lane whose spectrum is accumulated.
    pub lane: usize,
    /// Number of spectra accumulated per integration period.
    pub acc_len: u32,
}

/// Correlator settings.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct CorrConfig {
    /// First (unconjugated) lane of the correlated pair.
    pub lane_a: usize,
    /// Second (conjugated) lane of the correlated pair.
    pub lane_b: usize,
    /// Number of spectra accumulated per integration period.
    pub acc_len: u32,
}

/// One packet destination, claiming a contiguous run of frequency channels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// UDP destination as `ip:port`.
    pub addr: String,
    /// First frequency channel sent to this destination.
    pub start_chan: u16,
    /// Number of channels sent to this destination. Must be a multiple of
    /// the per-packet channel count.
    pub nchan: u16,
}

/// Complete F-engine configuration.
///
/// This record is applied atomically: every field is validated before any
/// block state is mutated. Optional fields leave the corresponding block at
/// its initialization defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FengConfig {
    /// Sample rate of the input lanes in Hz.
    pub sample_rate_hz: u64,
    /// Board identifier written into output packet headers.
    pub board_id: u16,
    /// Per-lane input source selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<InputSource>>,
    /// Noise generator seeds and lane assignments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseConfig>,
    /// Per-lane coarse delays, in samples (0-7).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delays: Option<Vec<u8>>,
    /// Post-transform scaling shift (0-12).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fft_shift: Option<u32>,
    /// Per-lane equalization coefficients, 512 per lane (one per 8
    /// channels), as floating-point gains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_coeffs: Option<Vec<Vec<f64>>>,
    /// Test vector generator setup. Lanes listed here have test vectors
    /// loaded and injection enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvg: Option<Vec<TvgLane>>,
    /// Autocorrelator setup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocorr: Option<AutocorrConfig>,
    /// Correlator setup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corr: Option<CorrConfig>,
    /// Number of frequency channels per output packet.
    pub nchan_packet: u16,
    /// Packet destinations.
    pub dests: Vec<Destination>,
    /// Enable packet transmission once the pipeline is synchronized.
    pub enable_tx: bool,
    /// Issue a software sync trigger instead of waiting for an external
    /// timing pulse.
    pub sw_sync: bool,
}

/// Per-lane sample statistics reported by the input block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LaneStats {
    /// Mean sample value, in ADC LSBs.
    pub mean: f64,
    /// Mean sample power, in ADC LSBs squared.
    pub power: f64,
    /// Sample RMS, in ADC LSBs.
    pub rms: f64,
}

/// Input block status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InputStatus {
    /// Current switch position of each lane.
    pub sources: Vec<InputSource>,
    /// Bit statistics of each lane over the last statistics window.
    pub stats: Vec<LaneStats>,
}

/// Channelizer status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PfbStatus {
    /// Currently applied scaling shift.
    pub fft_shift: u32,
    /// Number of saturated spectral values since the last sync or
    /// statistics reset. Any non-zero value deserves attention.
    pub overflow_count: u64,
    /// Lanes whose most recent spectrum contained saturated values.
    pub overflow_lanes: Vec<usize>,
}

/// Equalizer status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EqStatus {
    /// Number of quantizer saturation events since the last sync.
    pub clip_count: u64,
}

/// Integration tap status, shared by the autocorrelator and correlator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntegrationStatus {
    /// Spectra accumulated into the current (incomplete) period.
    pub current_count: u32,
    /// Number of completed integration periods since the last sync.
    pub periods: u64,
}

/// Transport status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EthStatus {
    /// Whether transmission is enabled.
    pub tx_enabled: bool,
    /// Packets handed to the network since the last statistics reset.
    pub tx_packets: u64,
    /// Bytes handed to the network since the last statistics reset.
    pub tx_bytes: u64,
    /// Packets dropped because the network path could not keep up.
    pub dropped: u64,
}

/// Synchronization status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SyncStatus {
    /// Whether a sync epoch has been established.
    pub synced: bool,
    /// Whether the sync logic is armed and waiting for a trigger.
    pub armed: bool,
    /// UTC time at which the current epoch was established, as an RFC 3339
    /// string, if synced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    /// Spectra produced since the current epoch.
    pub spectra: u64,
}

/// Full pipeline status, one record per block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Status {
    /// Synchronization status.
    pub sync: SyncStatus,
    /// Input block status.
    pub input: InputStatus,
    /// Channelizer status.
    pub pfb: PfbStatus,
    /// Equalizer status.
    pub eq: EqStatus,
    /// Autocorrelator status.
    pub autocorr: IntegrationStatus,
    /// Correlator status.
    pub corr: IntegrationStatus,
    /// Transport status.
    pub eth: EthStatus,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_roundtrip() {
        let json = r#"{
            "sample_rate_hz": 250000000,
            "board_id": 3,
            "sources": ["noise", "noise", "zero", "adc", "adc", "adc",
                        "adc", "adc", "adc", "adc", "adc", "counter"],
            "delays": [0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            "fft_shift": 11,
            "nchan_packet": 512,
            "dests": [
                {"addr": "10.10.0.2:10000", "start_chan": 512, "nchan": 3072}
            ],
            "enable_tx": true,
            "sw_sync": true
        }"#;
        let config: FengConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.sources.as_ref().unwrap()[0], InputSource::Noise);
        assert_eq!(config.sources.as_ref().unwrap()[11], InputSource::Counter);
        assert_eq!(config.dests[0].nchan, 3072);
        let back = serde_json::to_string(&config).unwrap();
        let config2: FengConfig = serde_json::from_str(&back).unwrap();
        assert_eq!(config, config2);
    }
}
