use crate::application::command::{CommandHandler, CommandReply, SlashCommand};
use crate::application::dialog::DialogStateMachine;
use crate::application::ledger::LedgerService;
use crate::application::resolver::UserReferenceResolver;
use crate::domain::dialog::{DialogResponse, DialogTurn};
use crate::domain::ports::{IdentityLookupRef, LedgerStoreRef};
use crate::error::Result;
use tracing::info;

/// An inbound request, already decoded from its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Warm-up ping with nothing to act on.
    KeepAlive,
    Dialog(DialogTurn),
    Command(SlashCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ack,
    Dialog(DialogResponse),
    Command(CommandReply),
}

/// The main entry point: hands each instruction to the pipeline for its interface.
pub struct RequestRouter {
    dialog: DialogStateMachine,
    commands: CommandHandler,
}

impl RequestRouter {
    pub fn new(store: LedgerStoreRef, lookup: IdentityLookupRef) -> Self {
        let ledger = LedgerService::new(store);
        let resolver = UserReferenceResolver::new(lookup);
        Self {
            dialog: DialogStateMachine::new(resolver.clone(), ledger.clone()),
            commands: CommandHandler::new(resolver, ledger),
        }
    }

    pub async fn route(&self, instruction: Instruction) -> Result<Response> {
        match instruction {
            Instruction::KeepAlive => {
                info!("ping");
                Ok(Response::Ack)
            }
            Instruction::Dialog(turn) => self.dialog.handle(turn).await.map(Response::Dialog),
            Instruction::Command(command) => {
                self.commands.handle(command).await.map(Response::Command)
            }
        }
    }
}
