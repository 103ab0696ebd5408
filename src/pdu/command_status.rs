/// SMPP v3.4 command_status codes. The full table is carried so that
/// every status an SMSC can legally send has a name and a description
/// for logging; anything outside the table is preserved in `Other`.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    ESME_ROK,
    ESME_RINVMSGLEN,
    ESME_RINVCMDLEN,
    ESME_RINVCMDID,
    ESME_RINVBNDSTS,
    ESME_RALYBND,
    ESME_RINVPRTFLG,
    ESME_RINVREGDLVFLG,
    ESME_RSYSERR,
    ESME_RINVSRCADR,
    ESME_RINVDSTADR,
    ESME_RINVMSGID,
    ESME_RBINDFAIL,
    ESME_RINVPASWD,
    ESME_RINVSYSID,
    ESME_RCANCELFAIL,
    ESME_RREPLACEFAIL,
    ESME_RMSGQFUL,
    ESME_RINVSERTYP,
    ESME_RINVNUMDESTS,
    ESME_RINVDLNAME,
    ESME_RINVDESTFLAG,
    ESME_RINVSUBREP,
    ESME_RINVESMCLASS,
    ESME_RCNTSUBDL,
    ESME_RSUBMITFAIL,
    ESME_RINVSRCTON,
    ESME_RINVSRCNPI,
    ESME_RINVDSTTON,
    ESME_RINVDSTNPI,
    ESME_RINVSYSTYP,
    ESME_RINVREPFLAG,
    ESME_RINVNUMMSGS,
    ESME_RTHROTTLED,
    ESME_RINVSCHED,
    ESME_RINVEXPIRY,
    ESME_RINVDFTMSGID,
    ESME_RX_T_APPN,
    ESME_RX_P_APPN,
    ESME_RX_R_APPN,
    ESME_RQUERYFAIL,
    ESME_RINVOPTPARSTREAM,
    ESME_ROPTPARNOTALLWD,
    ESME_RINVPARLEN,
    ESME_RMISSINGOPTPARAM,
    ESME_RINVOPTPARAMVAL,
    ESME_RDELIVERYFAILURE,
    ESME_RUNKNOWNERR,
    Other(u32),
}

impl CommandStatus {
    pub fn from_u32(value: u32) -> CommandStatus {
        use CommandStatus::*;
        match value {
            0x0000_0000 => ESME_ROK,
            0x0000_0001 => ESME_RINVMSGLEN,
            0x0000_0002 => ESME_RINVCMDLEN,
            0x0000_0003 => ESME_RINVCMDID,
            0x0000_0004 => ESME_RINVBNDSTS,
            0x0000_0005 => ESME_RALYBND,
            0x0000_0006 => ESME_RINVPRTFLG,
            0x0000_0007 => ESME_RINVREGDLVFLG,
            0x0000_0008 => ESME_RSYSERR,
            0x0000_000A => ESME_RINVSRCADR,
            0x0000_000B => ESME_RINVDSTADR,
            0x0000_000C => ESME_RINVMSGID,
            0x0000_000D => ESME_RBINDFAIL,
            0x0000_000E => ESME_RINVPASWD,
            0x0000_000F => ESME_RINVSYSID,
            0x0000_0011 => ESME_RCANCELFAIL,
            0x0000_0013 => ESME_RREPLACEFAIL,
            0x0000_0014 => ESME_RMSGQFUL,
            0x0000_0015 => ESME_RINVSERTYP,
            0x0000_0033 => ESME_RINVNUMDESTS,
            0x0000_0034 => ESME_RINVDLNAME,
            0x0000_0040 => ESME_RINVDESTFLAG,
            0x0000_0042 => ESME_RINVSUBREP,
            0x0000_0043 => ESME_RINVESMCLASS,
            0x0000_0044 => ESME_RCNTSUBDL,
            0x0000_0045 => ESME_RSUBMITFAIL,
            0x0000_0048 => ESME_RINVSRCTON,
            0x0000_0049 => ESME_RINVSRCNPI,
            0x0000_0050 => ESME_RINVDSTTON,
            0x0000_0051 => ESME_RINVDSTNPI,
            0x0000_0053 => ESME_RINVSYSTYP,
            0x0000_0054 => ESME_RINVREPFLAG,
            0x0000_0055 => ESME_RINVNUMMSGS,
            0x0000_0058 => ESME_RTHROTTLED,
            0x0000_0061 => ESME_RINVSCHED,
            0x0000_0062 => ESME_RINVEXPIRY,
            0x0000_0063 => ESME_RINVDFTMSGID,
            0x0000_0064 => ESME_RX_T_APPN,
            0x0000_0065 => ESME_RX_P_APPN,
            0x0000_0066 => ESME_RX_R_APPN,
            0x0000_0067 => ESME_RQUERYFAIL,
            0x0000_00C0 => ESME_RINVOPTPARSTREAM,
            0x0000_00C1 => ESME_ROPTPARNOTALLWD,
            0x0000_00C2 => ESME_RINVPARLEN,
            0x0000_00C3 => ESME_RMISSINGOPTPARAM,
            0x0000_00C4 => ESME_RINVOPTPARAMVAL,
            0x0000_00FE => ESME_RDELIVERYFAILURE,
            0x0000_00FF => ESME_RUNKNOWNERR,
            other => Other(other),
        }
    }

    pub fn as_u32(&self) -> u32 {
        use CommandStatus::*;
        match self {
            ESME_ROK => 0x0000_0000,
            ESME_RINVMSGLEN => 0x0000_0001,
            ESME_RINVCMDLEN => 0x0000_0002,
            ESME_RINVCMDID => 0x0000_0003,
            ESME_RINVBNDSTS => 0x0000_0004,
            ESME_RALYBND => 0x0000_0005,
            ESME_RINVPRTFLG => 0x0000_0006,
            ESME_RINVREGDLVFLG => 0x0000_0007,
            ESME_RSYSERR => 0x0000_0008,
            ESME_RINVSRCADR => 0x0000_000A,
            ESME_RINVDSTADR => 0x0000_000B,
            ESME_RINVMSGID => 0x0000_000C,
            ESME_RBINDFAIL => 0x0000_000D,
            ESME_RINVPASWD => 0x0000_000E,
            ESME_RINVSYSID => 0x0000_000F,
            ESME_RCANCELFAIL => 0x0000_0011,
            ESME_RREPLACEFAIL => 0x0000_0013,
            ESME_RMSGQFUL => 0x0000_0014,
            ESME_RINVSERTYP => 0x0000_0015,
            ESME_RINVNUMDESTS => 0x0000_0033,
            ESME_RINVDLNAME => 0x0000_0034,
            ESME_RINVDESTFLAG => 0x0000_0040,
            ESME_RINVSUBREP => 0x0000_0042,
            ESME_RINVESMCLASS => 0x0000_0043,
            ESME_RCNTSUBDL => 0x0000_0044,
            ESME_RSUBMITFAIL => 0x0000_0045,
            ESME_RINVSRCTON => 0x0000_0048,
            ESME_RINVSRCNPI => 0x0000_0049,
            ESME_RINVDSTTON => 0x0000_0050,
            ESME_RINVDSTNPI => 0x0000_0051,
            ESME_RINVSYSTYP => 0x0000_0053,
            ESME_RINVREPFLAG => 0x0000_0054,
            ESME_RINVNUMMSGS => 0x0000_0055,
            ESME_RTHROTTLED => 0x0000_0058,
            ESME_RINVSCHED => 0x0000_0061,
            ESME_RINVEXPIRY => 0x0000_0062,
            ESME_RINVDFTMSGID => 0x0000_0063,
            ESME_RX_T_APPN => 0x0000_0064,
            ESME_RX_P_APPN => 0x0000_0065,
            ESME_RX_R_APPN => 0x0000_0066,
            ESME_RQUERYFAIL => 0x0000_0067,
            ESME_RINVOPTPARSTREAM => 0x0000_00C0,
            ESME_ROPTPARNOTALLWD => 0x0000_00C1,
            ESME_RINVPARLEN => 0x0000_00C2,
            ESME_RMISSINGOPTPARAM => 0x0000_00C3,
            ESME_RINVOPTPARAMVAL => 0x0000_00C4,
            ESME_RDELIVERYFAILURE => 0x0000_00FE,
            ESME_RUNKNOWNERR => 0x0000_00FF,
            Other(other) => *other,
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == CommandStatus::ESME_ROK
    }

    pub fn description(&self) -> &'static str {
        use CommandStatus::*;
        match self {
            ESME_ROK => "No Error",
            ESME_RINVMSGLEN => "Message Length is invalid",
            ESME_RINVCMDLEN => "Command Length is invalid",
            ESME_RINVCMDID => "Invalid Command ID",
            ESME_RINVBNDSTS => "Incorrect BIND Status for given command",
            ESME_RALYBND => "ESME Already in Bound State",
            ESME_RINVPRTFLG => "Invalid Priority Flag",
            ESME_RINVREGDLVFLG => "Invalid Registered Delivery Flag",
            ESME_RSYSERR => "System Error",
            ESME_RINVSRCADR => "Invalid Source Address",
            ESME_RINVDSTADR => "Invalid Dest Addr",
            ESME_RINVMSGID => "Message ID is invalid",
            ESME_RBINDFAIL => "Bind Failed",
            ESME_RINVPASWD => "Invalid Password",
            ESME_RINVSYSID => "Invalid System ID",
            ESME_RCANCELFAIL => "Cancel SM Failed",
            ESME_RREPLACEFAIL => "Replace SM Failed",
            ESME_RMSGQFUL => "Message Queue Full",
            ESME_RINVSERTYP => "Invalid Service Type",
            ESME_RINVNUMDESTS => "Invalid number of destinations",
            ESME_RINVDLNAME => "Invalid Distribution List name",
            ESME_RINVDESTFLAG => "Destination flag is invalid (submit_multi)",
            ESME_RINVSUBREP => "Invalid 'submit with replace' request",
            ESME_RINVESMCLASS => "Invalid esm_class field data",
            ESME_RCNTSUBDL => "Cannot Submit to Distribution List",
            ESME_RSUBMITFAIL => "submit_sm or submit_multi failed",
            ESME_RINVSRCTON => "Invalid Source address TON",
            ESME_RINVSRCNPI => "Invalid Source address NPI",
            ESME_RINVDSTTON => "Invalid Destination address TON",
            ESME_RINVDSTNPI => "Invalid Destination address NPI",
            ESME_RINVSYSTYP => "Invalid system_type field",
            ESME_RINVREPFLAG => "Invalid replace_if_present flag",
            ESME_RINVNUMMSGS => "Invalid number of messages",
            ESME_RTHROTTLED => {
                "Throttling error (ESME has exceeded allowed message limits)"
            }
            ESME_RINVSCHED => "Invalid Scheduled Delivery Time",
            ESME_RINVEXPIRY => "Invalid message validity period (Expiry time)",
            ESME_RINVDFTMSGID => "Predefined Message Invalid or Not Found",
            ESME_RX_T_APPN => "ESME Receiver Temporary App Error Code",
            ESME_RX_P_APPN => "ESME Receiver Permanent App Error Code",
            ESME_RX_R_APPN => "ESME Receiver Reject Message Error Code",
            ESME_RQUERYFAIL => "query_sm request failed",
            ESME_RINVOPTPARSTREAM => {
                "Error in the optional part of the PDU Body"
            }
            ESME_ROPTPARNOTALLWD => "Optional Parameter not allowed",
            ESME_RINVPARLEN => "Invalid Parameter Length",
            ESME_RMISSINGOPTPARAM => "Expected Optional Parameter missing",
            ESME_RINVOPTPARAMVAL => "Invalid Optional Parameter Value",
            ESME_RDELIVERYFAILURE => "Delivery Failure (used for data_sm_resp)",
            ESME_RUNKNOWNERR => "Unknown Error",
            Other(_) => "Status outside the SMPP v3.4 table",
        }
    }
}
