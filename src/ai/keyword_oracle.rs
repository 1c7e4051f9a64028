//! Pure predicates over a card's keyword set
//!
//! Every predicate here is gated through `has_keyword`, which suppresses all
//! keyword abilities for a dry-dropped predator. Nothing else in the kernel
//! should read `Card::keywords` directly.

use crate::core::{Card, CardType, Keyword};

/// `false` if the card's abilities are inactive (`dry_dropped` on a
/// `Predator`) or explicitly cancelled; otherwise a raw membership test.
pub fn has_keyword(card: &Card, keyword: Keyword) -> bool {
    if card.abilities_cancelled {
        return false;
    }
    if card.dry_dropped && matches!(card.card_type, CardType::Predator) {
        return false;
    }
    card.has_raw_keyword(keyword)
}

pub fn has_haste(card: &Card) -> bool {
    has_keyword(card, Keyword::Haste)
}

pub fn has_toxic(card: &Card) -> bool {
    has_keyword(card, Keyword::Toxic)
}

pub fn has_neurotoxic(card: &Card) -> bool {
    has_keyword(card, Keyword::Neurotoxic)
}

/// Barrier absorbs exactly one damage instance; `has_barrier` is the current
/// charge, separate from whether the `Barrier` keyword is present at all
/// (an effect can grant or spend the charge independently of the tag).
/// Suppressed the same way every other keyword ability is.
pub fn has_barrier(card: &Card) -> bool {
    if card.abilities_cancelled {
        return false;
    }
    if card.dry_dropped && matches!(card.card_type, CardType::Predator) {
        return false;
    }
    card.has_barrier
}

pub fn has_ambush(card: &Card) -> bool {
    has_keyword(card, Keyword::Ambush)
}

pub fn has_lure(card: &Card) -> bool {
    has_keyword(card, Keyword::Lure)
}

pub fn is_passive(card: &Card) -> bool {
    has_keyword(card, Keyword::Passive)
}

pub fn is_hidden(card: &Card) -> bool {
    has_keyword(card, Keyword::Hidden)
}

pub fn is_invisible(card: &Card) -> bool {
    has_keyword(card, Keyword::Invisible)
}

pub fn is_harmless(card: &Card) -> bool {
    has_keyword(card, Keyword::Harmless)
}

pub fn is_immune(card: &Card) -> bool {
    has_keyword(card, Keyword::Immune)
}

pub fn is_edible(card: &Card) -> bool {
    !has_keyword(card, Keyword::Inedible)
}

pub fn is_free_play(card: &Card) -> bool {
    has_keyword(card, Keyword::FreePlay)
}

/// `can_attack(c)` does NOT consider summoning sickness; that gate only
/// applies when choosing to attack the opposing player directly.
pub fn can_attack(card: &Card) -> bool {
    card.current_hp > 0
        && !card.has_attacked
        && !card.frozen
        && !card.paralyzed
        && !card.webbed
        && !is_passive(card)
        && !is_harmless(card)
}

/// Whether this creature may legally attack the opposing player this turn:
/// `can_attack` plus either Haste or having been summoned before this turn.
pub fn can_attack_player(card: &Card, current_turn: u32) -> bool {
    can_attack(card) && (has_haste(card) || card.summoned_turn < current_turn)
}
