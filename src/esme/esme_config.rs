use clap::Parser;

/// SMPP v3.4 transceiver (ESME) client in Rust
#[derive(Parser, Clone, Debug)]
#[clap(name = "esme")]
pub struct EsmeConfig {
    /// system_id presented in the bind
    #[clap(long, default_value = "smppclient", env = "SYSTEM_ID")]
    pub system_id: String,

    /// Password presented in the bind
    #[clap(long, default_value = "password", env = "PASSWORD")]
    pub password: String,

    /// system_type presented in the bind
    #[clap(long, default_value = "", env = "SYSTEM_TYPE")]
    pub system_type: String,

    /// SMSC host to connect to
    #[clap(long, default_value = "127.0.0.1", env = "SMSC_HOST")]
    pub host: String,

    /// SMSC port to connect to
    #[clap(long, default_value = "2775", env = "SMSC_PORT")]
    pub port: u16,

    /// Step between consecutive sequence numbers
    #[clap(long, default_value = "1", env = "SMPP_INCREMENT")]
    pub smpp_increment: u32,

    /// First sequence number; must be between 1 and the increment
    #[clap(long, default_value = "1", env = "SMPP_OFFSET")]
    pub smpp_offset: u32,

    /// Default TON for destination addresses
    #[clap(long, default_value = "0")]
    pub dest_addr_ton: u8,

    /// Default NPI for destination addresses
    #[clap(long, default_value = "0")]
    pub dest_addr_npi: u8,

    /// TON of the address range in the bind
    #[clap(long, default_value = "0")]
    pub addr_ton: u8,

    /// NPI of the address range in the bind
    #[clap(long, default_value = "0")]
    pub addr_npi: u8,

    /// Address range in the bind
    #[clap(long, default_value = "")]
    pub address_range: String,

    /// Seconds between keep-alive enquire_link PDUs while bound
    #[clap(long, default_value = "55")]
    pub enquire_link_secs: u64,

    /// First reconnect delay in seconds
    #[clap(long, default_value = "30")]
    pub reconnect_initial_secs: u64,

    /// Upper bound on the reconnect delay in seconds
    #[clap(long, default_value = "45")]
    pub reconnect_max_secs: u64,

    /// Largest command_length accepted before the connection is dropped
    #[clap(long, default_value = "65536")]
    pub max_pdu_len: u32,

    /// Seconds a partial multipart assembly may wait for its remaining
    /// fragments
    #[clap(long, default_value = "86400")]
    pub multipart_ttl_secs: u64,
}

impl EsmeConfig {
    /// Configuration for `host:port` with every other field at its
    /// default. Mostly useful in tests and examples.
    pub fn for_smsc(host: &str, port: u16) -> EsmeConfig {
        EsmeConfig {
            system_id: String::from("smppclient"),
            password: String::from("password"),
            system_type: String::new(),
            host: String::from(host),
            port,
            smpp_increment: 1,
            smpp_offset: 1,
            dest_addr_ton: 0,
            dest_addr_npi: 0,
            addr_ton: 0,
            addr_npi: 0,
            address_range: String::new(),
            enquire_link_secs: 55,
            reconnect_initial_secs: 30,
            reconnect_max_secs: 45,
            max_pdu_len: 65536,
            multipart_ttl_secs: 86400,
        }
    }
}
