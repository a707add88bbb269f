use std::collections::HashMap;
use std::io::Write;
use textgen_core::model::{Context, MarkovChain, Token, TokenProbability};

/// Writes the diagnostic stats report for a finalized chain: every trained
/// context with its raw successor counts, then with its distribution as
/// per-token percentages.
///
/// Contexts and tokens are sorted so the report is stable across runs.
pub fn write_stats<W: Write>(
    writer: &mut W,
    chain: &MarkovChain,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(writer, "Word Counts:")?;
    let mut counted: Vec<(&Context, &HashMap<Token, u64>)> = chain.counts().iter().collect();
    counted.sort_by_key(|(context, _)| *context);
    for (context, successors) in counted {
        writeln!(writer, "[+] {}", context)?;
        let mut ordered: Vec<(&Token, &u64)> = successors.iter().collect();
        ordered.sort_by_key(|(token, _)| *token);
        for (token, count) in ordered {
            writeln!(writer, "[++] {} - {}", token, count)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Word Probabilities:")?;
    for (context, distribution) in ordered_distributions(chain)? {
        writeln!(writer, "[-] {}", context)?;
        let mut last = 0.0;
        for entry in distribution {
            let percent = ((entry.cumulative - last) * 100.0).round() as u32;
            writeln!(writer, "[--] {} - {}%", entry.token, percent)?;
            last = entry.cumulative;
        }
    }

    Ok(())
}

fn ordered_distributions(
    chain: &MarkovChain,
) -> Result<Vec<(&Context, &[TokenProbability])>, Box<dyn std::error::Error>> {
    let mut entries: Vec<(&Context, &[TokenProbability])> =
        chain.probabilities()?.iter().collect();
    entries.sort_by_key(|(context, _)| *context);
    Ok(entries)
}
