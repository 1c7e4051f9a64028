//! Closed keyword and effect-family vocabularies
//!
//! The source system lets any card carry any ability tag; here the
//! vocabulary is closed so the oracle can reason over it exhaustively, and
//! anything outside the set is modeled as `Keyword::Unknown` rather than
//! silently dispatched (see `ai::keyword_oracle`'s inertness test).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Haste,
    FreePlay,
    Hidden,
    Invisible,
    Lure,
    Passive,
    Barrier,
    Acuity,
    Immune,
    Edible,
    Inedible,
    Scavenge,
    Neurotoxic,
    Ambush,
    Toxic,
    Poisonous,
    Harmless,
    Frozen,
    Regeneration,
    /// Catch-all for any tag outside the closed vocabulary above. Always
    /// inert: no oracle predicate, evaluator bonus, or heuristic treats it
    /// as present.
    Unknown,
}

impl Keyword {
    /// Parse a raw tag string from the simulator into a closed `Keyword`.
    /// Anything unrecognized becomes `Unknown` rather than an error, per the
    /// "unknown tags are inert" rule.
    pub fn from_tag(tag: &str) -> Keyword {
        match tag {
            "Haste" => Keyword::Haste,
            "FreePlay" => Keyword::FreePlay,
            "Hidden" => Keyword::Hidden,
            "Invisible" => Keyword::Invisible,
            "Lure" => Keyword::Lure,
            "Passive" => Keyword::Passive,
            "Barrier" => Keyword::Barrier,
            "Acuity" => Keyword::Acuity,
            "Immune" => Keyword::Immune,
            "Edible" => Keyword::Edible,
            "Inedible" => Keyword::Inedible,
            "Scavenge" => Keyword::Scavenge,
            "Neurotoxic" => Keyword::Neurotoxic,
            "Ambush" => Keyword::Ambush,
            "Toxic" => Keyword::Toxic,
            "Poisonous" => Keyword::Poisonous,
            "Harmless" => Keyword::Harmless,
            "Frozen" => Keyword::Frozen,
            "Regeneration" => Keyword::Regeneration,
            _ => Keyword::Unknown,
        }
    }
}

/// A target-group selector as used by spell target declarations and
/// `selectFromGroup` effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetGroup {
    FriendlyCreatures,
    FriendlyCreature,
    FriendlyPredators,
    FriendlyPredator,
    FriendlyPrey,
    EnemyCreatures,
    EnemyCreature,
    EnemyPredators,
    EnemyPredator,
    EnemyPrey,
    AllCreatures,
    AnyCreature,
    Carrion,
    FriendlyCarrion,
    EnemyCarrion,
}

/// Stable effect-family tag read through a narrow accessor by the heuristic
/// ordering and quiescence search. Card scripts set these; the kernel never
/// inspects engine-internal effect descriptors beyond this tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectFamilyTag {
    Damage,
    DamageAll,
    DamageCreature,
    DamageAllEnemyCreatures,
    DamageOpponent,
    Kill,
    KillAll,
    KillAllEnemyCreatures,
    DestroyCreature,
    SelectFromGroup {
        damage: Option<i32>,
        steal: bool,
        kind: TargetGroup,
    },
    FreezeAllEnemies,
    FreezeAllCreatures,
    Heal,
    Draw,
}

impl EffectFamilyTag {
    /// Families the quiescence search treats as "noisy" (tactical) moves.
    pub fn is_noisy(&self) -> bool {
        matches!(
            self,
            EffectFamilyTag::Damage
                | EffectFamilyTag::DamageAll
                | EffectFamilyTag::DamageCreature
                | EffectFamilyTag::DamageAllEnemyCreatures
                | EffectFamilyTag::DamageOpponent
                | EffectFamilyTag::Kill
                | EffectFamilyTag::KillAll
                | EffectFamilyTag::KillAllEnemyCreatures
                | EffectFamilyTag::DestroyCreature
        )
    }

    /// Families the move-ordering heuristic treats as removal.
    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            EffectFamilyTag::Kill
                | EffectFamilyTag::KillAll
                | EffectFamilyTag::KillAllEnemyCreatures
                | EffectFamilyTag::DestroyCreature
        )
    }

    pub fn is_board_wipe(&self) -> bool {
        matches!(
            self,
            EffectFamilyTag::DamageAll
                | EffectFamilyTag::DamageAllEnemyCreatures
                | EffectFamilyTag::KillAll
                | EffectFamilyTag::KillAllEnemyCreatures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_is_inert() {
        assert_eq!(Keyword::from_tag("SuperFlarb"), Keyword::Unknown);
        assert_eq!(Keyword::from_tag("Haste"), Keyword::Haste);
    }

    #[test]
    fn noisy_families_cover_damage_and_removal() {
        assert!(EffectFamilyTag::Kill.is_noisy());
        assert!(EffectFamilyTag::Heal.is_noisy() == false);
        assert!(EffectFamilyTag::DestroyCreature.is_removal());
        assert!(EffectFamilyTag::KillAll.is_board_wipe());
    }
}
