use textgen_core::model::{Context, MarkovChain};
use textgen_core::text::{compose, tokenize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // An order-2 chain: two preceding tokens predict the next one.
    // 'with_seed' pins the random source so this walkthrough is reproducible;
    // use 'MarkovChain::new' for OS-seeded randomness.
    let mut chain = MarkovChain::with_seed(2, 42)?;

    // Order zero is rejected up front
    match MarkovChain::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("An order-0 chain is invalid"),
    }

    // Each document is trained separately: every call gets a fresh window,
    // so no context spans two documents.
    let documents = [
        "The cat sat on the mat. The cat ran away.",
        "The dog sat on the mat, and the dog slept.",
        "A bird sat on the fence. The bird sang.",
    ];
    for document in documents {
        let recorded = chain.train_document(tokenize(document))?;
        println!("Recorded {} observations", recorded);
    }

    // Finalization converts counts into cumulative distributions. It runs
    // exactly once; training afterwards is an error.
    chain.finalize()?;
    match chain.train_document(tokenize("too late")) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Training after finalization is rejected"),
    }

    // Inspect one trained context. Contexts store tokens newest-first:
    // ["on", "sat"] is the state after reading "... sat on".
    let context = Context::new(vec!["on".to_string(), "sat".to_string()]);
    if let Some(distribution) = chain.probabilities()?.distribution(&context) {
        println!("After '{}':", context);
        for entry in distribution {
            println!("  {} (cumulative {:.2})", entry.token, entry.cumulative);
        }
    }

    // A generator owns its own context and random source; the chain stays
    // read-only during generation. The first emitted token is the seed
    // context's newest token, each later one is freshly sampled.
    let mut generator = chain.generator()?;
    let seed = generator.seed()?;
    println!("Seeded at '{}'", seed);
    let tokens = generator.generate(30)?;
    println!("Generated: {}", compose(tokens));

    // A custom start context is allowed too, even an untrained one; the
    // walk just stalls instead of failing.
    let mut generator = chain.generator()?;
    generator.seed_with(Context::new(vec!["sat".to_string(), "bird".to_string()]))?;
    let tokens = generator.generate(30)?;
    println!("From 'bird sat': {}", compose(tokens));

    Ok(())
}
