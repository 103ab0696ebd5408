use log::*;
use std::sync::Arc;

use crate::pdu::{CommandStatus, Pdu};

/// The six fault classes command statuses route into. Message-level
/// faults concern one submission; connection-level faults concern the
/// session; throttle asks the host to slow down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    Ok,
    MessPermFault,
    MessTempFault,
    ConnPermFault,
    ConnTempFault,
    ConnThrottle,
}

/// Maps a command_status onto its fault class. Total: every status in
/// the SMPP v3.4 table has exactly one class, and statuses outside the
/// table are treated as `Ok` (the engine logs them).
pub fn classify(status: CommandStatus) -> FaultClass {
    use CommandStatus::*;
    match status {
        ESME_ROK => FaultClass::Ok,

        ESME_RINVMSGLEN | ESME_RINVCMDLEN | ESME_RINVCMDID
        | ESME_RINVPRTFLG | ESME_RINVREGDLVFLG | ESME_RINVSRCADR
        | ESME_RINVDSTADR | ESME_RINVMSGID | ESME_RCANCELFAIL
        | ESME_RREPLACEFAIL | ESME_RINVNUMDESTS | ESME_RINVDLNAME
        | ESME_RINVDESTFLAG | ESME_RINVSUBREP | ESME_RINVESMCLASS
        | ESME_RCNTSUBDL | ESME_RINVSRCTON | ESME_RINVSRCNPI
        | ESME_RINVDSTTON | ESME_RINVDSTNPI | ESME_RINVREPFLAG
        | ESME_RINVSCHED | ESME_RINVEXPIRY | ESME_RINVDFTMSGID
        | ESME_RX_P_APPN | ESME_RX_R_APPN | ESME_RQUERYFAIL
        | ESME_RINVOPTPARSTREAM | ESME_ROPTPARNOTALLWD | ESME_RINVPARLEN
        | ESME_RMISSINGOPTPARAM | ESME_RINVOPTPARAMVAL => {
            FaultClass::MessPermFault
        }

        ESME_RSUBMITFAIL | ESME_RINVNUMMSGS | ESME_RDELIVERYFAILURE
        | ESME_RUNKNOWNERR | ESME_RX_T_APPN => FaultClass::MessTempFault,

        ESME_RINVBNDSTS | ESME_RALYBND => FaultClass::ConnTempFault,

        ESME_RSYSERR | ESME_RBINDFAIL | ESME_RINVPASWD | ESME_RINVSYSID
        | ESME_RINVSERTYP | ESME_RINVSYSTYP => FaultClass::ConnPermFault,

        ESME_RMSGQFUL | ESME_RTHROTTLED => FaultClass::ConnThrottle,

        Other(_) => FaultClass::Ok,
    }
}

/// A handler observing every PDU whose status falls in its class. Runs
/// on the dispatch path and must not block.
pub type FaultHandler = Arc<dyn Fn(&Pdu) + Send + Sync>;

/// One installable handler per fault class. Defaults log the PDU and
/// nothing more.
#[derive(Clone)]
pub struct FaultHandlers {
    ok: FaultHandler,
    mess_permfault: FaultHandler,
    mess_tempfault: FaultHandler,
    conn_permfault: FaultHandler,
    conn_tempfault: FaultHandler,
    conn_throttle: FaultHandler,
}

impl FaultHandlers {
    pub fn new() -> FaultHandlers {
        FaultHandlers {
            ok: Arc::new(|_| {}),
            mess_permfault: Arc::new(|pdu| {
                debug!("mess_permfault: {:?}", pdu)
            }),
            mess_tempfault: Arc::new(|pdu| {
                debug!("mess_tempfault: {:?}", pdu)
            }),
            conn_permfault: Arc::new(|pdu| {
                debug!("conn_permfault: {:?}", pdu)
            }),
            conn_tempfault: Arc::new(|pdu| {
                debug!("conn_tempfault: {:?}", pdu)
            }),
            conn_throttle: Arc::new(|pdu| {
                debug!("conn_throttle: {:?}", pdu)
            }),
        }
    }

    pub fn set(&mut self, class: FaultClass, handler: FaultHandler) {
        match class {
            FaultClass::Ok => self.ok = handler,
            FaultClass::MessPermFault => self.mess_permfault = handler,
            FaultClass::MessTempFault => self.mess_tempfault = handler,
            FaultClass::ConnPermFault => self.conn_permfault = handler,
            FaultClass::ConnTempFault => self.conn_tempfault = handler,
            FaultClass::ConnThrottle => self.conn_throttle = handler,
        }
    }

    /// Classifies the PDU's status and invokes the matching handler.
    pub fn dispatch(&self, pdu: &Pdu) -> FaultClass {
        let status = pdu.command_status;
        let class = classify(status);
        if let CommandStatus::Other(code) = status {
            warn!(
                "Unknown command_status {:#010X}, treating as ok: {:?}",
                code, pdu
            );
        }
        let handler = match class {
            FaultClass::Ok => &self.ok,
            FaultClass::MessPermFault => &self.mess_permfault,
            FaultClass::MessTempFault => &self.mess_tempfault,
            FaultClass::ConnPermFault => &self.conn_permfault,
            FaultClass::ConnTempFault => &self.conn_tempfault,
            FaultClass::ConnThrottle => &self.conn_throttle,
        };
        handler(pdu);
        class
    }
}

impl Default for FaultHandlers {
    fn default() -> Self {
        FaultHandlers::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::PduBody;
    use std::sync::Mutex;

    #[test]
    fn the_classifier_matches_the_routing_table() {
        use CommandStatus::*;
        assert_eq!(classify(ESME_ROK), FaultClass::Ok);
        assert_eq!(classify(ESME_RINVMSGLEN), FaultClass::MessPermFault);
        assert_eq!(classify(ESME_RINVDSTADR), FaultClass::MessPermFault);
        assert_eq!(classify(ESME_RSUBMITFAIL), FaultClass::MessTempFault);
        assert_eq!(classify(ESME_RDELIVERYFAILURE), FaultClass::MessTempFault);
        assert_eq!(classify(ESME_RINVBNDSTS), FaultClass::ConnTempFault);
        assert_eq!(classify(ESME_RALYBND), FaultClass::ConnTempFault);
        assert_eq!(classify(ESME_RSYSERR), FaultClass::ConnPermFault);
        assert_eq!(classify(ESME_RINVPASWD), FaultClass::ConnPermFault);
        assert_eq!(classify(ESME_RMSGQFUL), FaultClass::ConnThrottle);
        assert_eq!(classify(ESME_RTHROTTLED), FaultClass::ConnThrottle);
    }

    #[test]
    fn every_status_in_the_table_has_a_class() {
        // classify() is a total match, so this is really checking that
        // nothing maps by accident onto the permissive unknown branch.
        for code in 0x00..=0xFFu32 {
            let status = CommandStatus::from_u32(code);
            if !matches!(status, CommandStatus::Other(_)) {
                let _ = classify(status);
            }
        }
        assert_eq!(classify(CommandStatus::Other(0x123)), FaultClass::Ok);
    }

    #[test]
    fn installed_handlers_see_their_class_only() {
        let seen: Arc<Mutex<Vec<FaultClass>>> =
            Arc::new(Mutex::new(Vec::new()));
        let mut handlers = FaultHandlers::new();
        for class in &[
            FaultClass::Ok,
            FaultClass::MessPermFault,
            FaultClass::ConnThrottle,
        ] {
            let class = *class;
            let seen = Arc::clone(&seen);
            handlers.set(
                class,
                Arc::new(move |_| seen.lock().unwrap().push(class)),
            );
        }

        let pdu = |status| {
            Pdu::new(status, 1, PduBody::EnquireLinkResp)
        };
        assert_eq!(
            handlers.dispatch(&pdu(CommandStatus::ESME_RTHROTTLED)),
            FaultClass::ConnThrottle
        );
        assert_eq!(
            handlers.dispatch(&pdu(CommandStatus::ESME_ROK)),
            FaultClass::Ok
        );
        assert_eq!(
            handlers.dispatch(&pdu(CommandStatus::ESME_RINVSRCADR)),
            FaultClass::MessPermFault
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                FaultClass::ConnThrottle,
                FaultClass::Ok,
                FaultClass::MessPermFault
            ]
        );
    }
}
