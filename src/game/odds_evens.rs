//! Odds and Evens
//!
//! Two players each choose a bit and commit to a secret whose length is
//! `16 + bit`. The sum of the two secret lengths decides the game: even
//! means Even wins, odd means Odd wins (the XOR of the bits).
//!
//! Each player publishes an [`Announcement`] (seat, key, commitment). The
//! locking program is built from the two announcements with the winner's
//! key fixed in. Claiming the output reveals both secrets, and the predicate
//! checks each against its published commitment before the winner's
//! signature:
//!
//! ```text
//! locking:   HASH160 <even-commit> EQUALVERIFY
//!            HASH160 <odd-commit>  EQUALVERIFY
//!            <winner-pubkey> CHECKSIG
//! unlocking: <sig> <odd-secret> <even-secret>
//! ```

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;
use uuid::Uuid;

use super::commitment::{CommitmentError, Secret};
use super::player::{Announcement, Choice, Party, Player};
use crate::core::keys::KeyPair;
use crate::error::{ConstraintError, Result};
use crate::script::{LockingProgram, Opcode, ProgramBuilder, UnlockingProgram};
use crate::tx::UnsignedTransaction;

/// Decide the game from the two secrets.
///
/// Pure; does not care whether the secrets have been revealed yet.
pub fn determine_winner(even_secret: &Secret, odd_secret: &Secret) -> Party {
    if (even_secret.len() + odd_secret.len()) % 2 == 0 {
        Party::Even
    } else {
        Party::Odd
    }
}

fn check_seat(expected: Party, got: Party) -> Result<()> {
    if expected != got {
        return Err(ConstraintError::WrongSeat { expected, got }.into());
    }
    Ok(())
}

/// Predicate paying `winner`, built only from what the players published.
pub fn winner_predicate(
    even: &Announcement,
    odd: &Announcement,
    winner: Party,
) -> Result<LockingProgram> {
    check_seat(Party::Even, even.party)?;
    check_seat(Party::Odd, odd.party)?;
    let winner_key = match winner {
        Party::Even => &even.public_key,
        Party::Odd => &odd.public_key,
    };

    let program = ProgramBuilder::new()
        .op(Opcode::Hash160)
        .data(even.commitment.as_bytes())
        .op(Opcode::EqualVerify)
        .op(Opcode::Hash160)
        .data(odd.commitment.as_bytes())
        .op(Opcode::EqualVerify)
        .data(winner_key.as_bytes())
        .op(Opcode::CheckSig)
        .build_locking()?;
    Ok(program)
}

/// One game instance: both players, the winner and who will sign the claim.
#[derive(Debug)]
pub struct OddsAndEvens {
    id: Uuid,
    even: Player,
    odd: Player,
    winner: Party,
    claimant: Party,
}

impl OddsAndEvens {
    /// Set up a game with fresh keys and secrets from the OS generator.
    pub fn new(even_choice: Choice, odd_choice: Choice) -> Self {
        Self::with_rng(even_choice, odd_choice, &mut OsRng)
    }

    /// Set up a game drawing keys and secrets from `rng`.
    pub fn with_rng<R: RngCore + CryptoRng>(
        even_choice: Choice,
        odd_choice: Choice,
        rng: &mut R,
    ) -> Self {
        let even = Player::generate(Party::Even, even_choice, rng);
        let odd = Player::generate(Party::Odd, odd_choice, rng);
        Self::seat(even, odd)
    }

    /// Set up a game from existing players.
    pub fn from_players(even: Player, odd: Player) -> Result<Self> {
        check_seat(Party::Even, even.party())?;
        check_seat(Party::Odd, odd.party())?;
        Ok(Self::seat(even, odd))
    }

    fn seat(even: Player, odd: Player) -> Self {
        let winner = determine_winner(even.secret(), odd.secret());
        let id = Uuid::new_v4();
        debug!(
            game = %id,
            even_commitment = %even.commitment(),
            odd_commitment = %odd.commitment(),
            ?winner,
            "odds and evens game set up"
        );
        Self {
            id,
            even,
            odd,
            winner,
            claimant: winner,
        }
    }

    /// Have `party` sign the claim instead of the winner.
    ///
    /// Only the winner's signature satisfies the predicate; any other
    /// claimant produces a witness the machine rejects.
    pub fn claimed_by(mut self, party: Party) -> Self {
        self.claimant = party;
        self
    }

    /// Instance identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Winner under the parity rule.
    pub fn winner(&self) -> Party {
        self.winner
    }

    /// Party whose key signs the claim.
    pub fn claimant(&self) -> Party {
        self.claimant
    }

    /// Player in the given seat.
    pub fn player(&self, party: Party) -> &Player {
        match party {
            Party::Even => &self.even,
            Party::Odd => &self.odd,
        }
    }

    /// What each player publishes: Even's announcement, then Odd's.
    pub fn announcements(&self) -> (Announcement, Announcement) {
        (self.even.announce(), self.odd.announce())
    }

    fn key(&self, party: Party) -> &KeyPair {
        self.player(party).key()
    }

    /// Check revealed secrets against the published commitments.
    pub fn check_reveals(
        &self,
        even_secret: &Secret,
        odd_secret: &Secret,
    ) -> std::result::Result<Party, CommitmentError> {
        self.even.commitment().open(even_secret)?;
        self.odd.commitment().open(odd_secret)?;
        Ok(determine_winner(even_secret, odd_secret))
    }

    /// Predicate paying the winner once both secrets are revealed.
    pub fn locking_program(&self) -> Result<LockingProgram> {
        let (even, odd) = self.announcements();
        winner_predicate(&even, &odd, self.winner)
    }

    /// Claim witness: claimant's signature, then Odd's and Even's secrets.
    ///
    /// Even's secret is pushed last because the predicate checks it first.
    pub fn unlocking_program(&self, tx: &UnsignedTransaction) -> Result<UnlockingProgram> {
        let signature = self.key(self.claimant).sign_hash(&tx.signing_hash())?;
        debug!(game = %self.id, claimant = ?self.claimant, "claim signed");

        let program = ProgramBuilder::new()
            .data(signature.to_bytes())
            .data(self.odd.secret().as_bytes())
            .data(self.even.secret().as_bytes())
            .build_unlocking()?;
        Ok(program)
    }
}
