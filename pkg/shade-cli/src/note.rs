use clap::Subcommand;
use serde::Serialize;
use shade_protocol::{Element, Note};

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    /// Generate a fresh note and print its backup string
    New {
        /// The value the note commits to
        #[arg(long)]
        amount: u128,
        /// The chain the note is meant for
        #[arg(long, default_value_t = 1)]
        chain_id: u64,
    },
    /// Show the public values of a note
    Inspect {
        /// A note backup string, as printed by `shade note new`
        note: Note,
    },
}

/// What is printed for a note
///
/// Only the commitment goes on chain at deposit time, and only the nullifier hash at withdrawal
/// time. The backup string must stay private.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
    pub commitment: Element,
    pub nullifier_hash: Element,
    pub amount: u128,
    pub chain_id: u64,
}

impl NoteSummary {
    pub fn new(note: &Note, with_backup: bool) -> Self {
        Self {
            backup: with_backup.then(|| note.to_string()),
            commitment: note.commitment(),
            nullifier_hash: note.nullifier_hash(),
            amount: note.amount(),
            chain_id: note.chain_id(),
        }
    }
}

pub fn run(command: NoteCommand) -> eyre::Result<NoteSummary> {
    match command {
        NoteCommand::New { amount, chain_id } => {
            let note = Note::generate(amount, chain_id);
            tracing::info!(commitment = %note.commitment(), "generated note");
            Ok(NoteSummary::new(&note, true))
        }
        NoteCommand::Inspect { note } => Ok(NoteSummary::new(&note, false)),
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

    use super::*;

    #[test]
    fn inspect_hides_the_backup() {
        let mut rng = ChaChaRng::from_seed([1; 32]);
        let note = Note::generate_with(&mut rng, 500, 5);

        let summary = run(NoteCommand::Inspect { note }).unwrap();
        assert!(summary.backup.is_none());
        assert_eq!(summary.commitment, note.commitment());
        assert_eq!(summary.amount, 500);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("backup").is_none());
        assert_eq!(json["chainId"], 5);
    }

    #[test]
    fn new_notes_print_a_parseable_backup() {
        let summary = run(NoteCommand::New {
            amount: 42,
            chain_id: 1,
        })
        .unwrap();

        let note: Note = summary.backup.unwrap().parse().unwrap();
        assert_eq!(note.amount(), 42);
        assert_eq!(note.commitment(), summary.commitment);
    }
}
