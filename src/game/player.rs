//! Players of the odds-and-evens game.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::commitment::{Commitment, Secret};
use crate::core::keys::{KeyPair, PublicKey};

/// Side of the game. Even wins when the choices match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Wins on an even length sum.
    Even,
    /// Wins on an odd length sum.
    Odd,
}

impl Party {
    /// The other side.
    pub fn opponent(self) -> Party {
        match self {
            Party::Even => Party::Odd,
            Party::Odd => Party::Even,
        }
    }
}

/// A player's private bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    /// Bit 0.
    Zero,
    /// Bit 1.
    One,
}

impl Choice {
    /// Numeric value, added to the base secret length.
    pub fn value(self) -> usize {
        match self {
            Choice::Zero => 0,
            Choice::One => 1,
        }
    }
}

/// What a player publishes before the game is funded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Seat.
    pub party: Party,
    /// Key that may claim if this player wins.
    pub public_key: PublicKey,
    /// Commitment to the player's secret.
    pub commitment: Commitment,
}

/// A player's private state: key and committed secret.
///
/// Generated fresh per game and never reused.
#[derive(Clone, Debug)]
pub struct Player {
    party: Party,
    key: KeyPair,
    secret: Secret,
    commitment: Commitment,
}

impl Player {
    /// New player with a fresh key and a secret encoding `choice`.
    pub fn generate<R: RngCore + CryptoRng>(party: Party, choice: Choice, rng: &mut R) -> Self {
        let key = KeyPair::generate(rng);
        let secret = Secret::generate(choice.value(), rng);
        Self::from_parts(party, key, secret)
    }

    /// Player from existing material.
    pub fn from_parts(party: Party, key: KeyPair, secret: Secret) -> Self {
        let commitment = Commitment::commit(&secret);
        Self {
            party,
            key,
            secret,
            commitment,
        }
    }

    /// Seat.
    pub fn party(&self) -> Party {
        self.party
    }

    /// Signing key.
    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    /// Committed secret.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Published commitment.
    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Public part of this player.
    pub fn announce(&self) -> Announcement {
        Announcement {
            party: self.party,
            public_key: self.key.public_key().clone(),
            commitment: self.commitment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::commitment::SECRET_BASE_LEN;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_secret_length_encodes_choice() {
        let mut rng = StdRng::seed_from_u64(11);
        let zero = Player::generate(Party::Even, Choice::Zero, &mut rng);
        let one = Player::generate(Party::Odd, Choice::One, &mut rng);

        assert_eq!(zero.secret().len(), SECRET_BASE_LEN);
        assert_eq!(one.secret().len(), SECRET_BASE_LEN + 1);
    }

    #[test]
    fn test_announcement_matches_private_state() {
        let player = Player::generate(Party::Odd, Choice::Zero, &mut StdRng::seed_from_u64(12));
        let announcement = player.announce();

        assert_eq!(announcement.party, Party::Odd);
        assert_eq!(&announcement.public_key, player.key().public_key());
        assert!(announcement.commitment.verify(player.secret()));
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Party::Even.opponent(), Party::Odd);
        assert_eq!(Party::Odd.opponent(), Party::Even);
    }
}
