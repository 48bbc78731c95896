//! Renders the three output artifacts in the base-4 alphabet, plus the
//! optional terminal listing.

use color_print::cprintln;

use arch::base4;

use crate::context::{Context, IC_START};
use crate::symbols::SymbolKind;

/// The `.ob` object image: a header with the code and data lengths, then
/// every instruction word and every data word with its address.
pub fn render_ob(ctx: &Context) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\t{}\t{}\n",
        base4::header_address_to_base4(ctx.icf() - IC_START),
        base4::header_code_to_base4(ctx.dcf())
    ));
    for (address, value) in code_words(ctx) {
        out.push_str(&format!(
            "{}\t{}\n",
            base4::address_to_base4(address),
            base4::word_to_base4(value)
        ));
    }
    for word in &ctx.data {
        out.push_str(&format!(
            "{}\t{}\n",
            base4::address_to_base4(word.address),
            base4::word_to_base4(word.value)
        ));
    }
    out
}

/// The `.ent` artifact, or None when no `.entry` directive was seen.
pub fn render_ent(ctx: &Context) -> Option<String> {
    if !ctx.entries {
        return None;
    }
    let mut out = String::new();
    for (name, sym) in ctx.symbols.iter() {
        if sym.kind == SymbolKind::Entry {
            out.push_str(&format!(
                "{}\t{}\n",
                name,
                base4::address_to_base4(sym.value)
            ));
        }
    }
    Some(out)
}

/// The `.ext` artifact, one line per external use site, or None when the
/// program references no externals.
pub fn render_ext(ctx: &Context) -> Option<String> {
    if ctx.externals.is_empty() {
        return None;
    }
    Some(
        ctx.externals
            .iter()
            .map(|(name, address)| format!("{}\t{}\n", name, base4::address_to_base4(*address)))
            .collect(),
    )
}

fn code_words(ctx: &Context) -> impl Iterator<Item = (u16, u16)> + '_ {
    ctx.orders.iter().flat_map(|order| {
        order
            .words
            .iter()
            .enumerate()
            .map(move |(idx, word)| (order.ic + idx as u16, word.value()))
    })
}

// ----------------------------------------------------------------------------

/// Terminal listing of the assembled image.
pub fn print_listing(ctx: &Context) {
    println!("{}+{}", "-".repeat(7), "-".repeat(24));
    for (address, value) in code_words(ctx) {
        cprintln!(
            "<blue>[{:>4}]</> | {:010b} <green>{}</>",
            address,
            value,
            base4::word_to_base4(value)
        );
    }
    for word in &ctx.data {
        cprintln!(
            "<blue>[{:>4}]</> | {:010b} <yellow>{}</>",
            word.address,
            word.value,
            base4::word_to_base4(word.value)
        );
    }
    println!("{}+{}", "-".repeat(7), "-".repeat(24));
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::has_errors;
    use crate::firstpass::first_pass;
    use crate::secondpass::second_pass;

    fn assemble(src: &str) -> Context {
        let mut ctx = Context::new();
        let diags = first_pass(src, &mut ctx);
        assert!(!has_errors(&diags), "{diags:?}");
        let diags = second_pass(src, &mut ctx);
        assert!(!has_errors(&diags), "{diags:?}");
        ctx.shift_data_words();
        ctx
    }

    #[test]
    fn object_image_for_immediate_print() {
        let ctx = assemble("prn #-5\nstop\n");
        assert_eq!(
            render_ob(&ctx),
            "\taad\taa\nbcba\tdbaaa\nbcbb\tddcda\nbcbc\tddaaa\n"
        );
        assert_eq!(render_ent(&ctx), None);
        assert_eq!(render_ext(&ctx), None);
    }

    #[test]
    fn data_addresses_follow_the_code() {
        let ctx = assemble("prn #-5\nstop\nD: .data 7\n");
        let ob = render_ob(&ctx);
        // code runs 100..=102, so the data word lands at 103
        assert!(ob.contains("bcbd\taaabd\n"), "{ob}");
        assert!(ob.starts_with("\taad\tab\n"));
    }

    #[test]
    fn entries_render_in_insertion_order() {
        let ctx = assemble("A: stop\nB: stop\n.entry B\n.entry A\n");
        let ent = render_ent(&ctx).unwrap();
        assert_eq!(ent, "A\tbcba\nB\tbcbb\n");
    }

    #[test]
    fn externals_render_per_use_site() {
        let ctx = assemble(".extern E\njmp E\njmp E\nstop\n");
        let ext = render_ext(&ctx).unwrap();
        assert_eq!(ext, "E\tbcbb\nE\tbcbd\n");
    }
}
