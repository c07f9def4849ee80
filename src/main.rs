//! trisign - CLI Entry Point
//!
//! Commands:
//! - `trisign address <seed>` - Derive addresses
//! - `trisign sign <seed> <bundle>` - Sign a bundle hash
//! - `trisign verify <address> <bundle> <fragments>...` - Verify signature fragments
//! - `trisign checksum add|check|verify <address>` - Address checksums
//! - `trisign hash <trytes>` - Hash trytes with a sponge
//! - `trisign digests <seed>` - Key digests as hex, for multisig
//! - `trisign multisig <hex>...` - Combine co-signer digests into an address
//! - `trisign seed` - Generate a random seed
//! - `trisign test` - Built-in self-test

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use trisign::{
    checksum, signing, Address, Config, Kerl, MultiSigningAddress, SecurityLevel, Seed, Signature,
    Signing, Sponge, SpongeKind,
};
use trisign::ternary::{trits_to_trytes, trytes_to_trits, HASH_TRITS};

#[derive(Parser)]
#[command(name = "trisign")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "Balanced ternary one-time signatures, sponge hashes and address checksums")]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive one or more addresses from a seed
    Address {
        /// Seed trytes (up to 81, padded with 9)
        seed: String,
        /// First key index
        #[arg(short, long, default_value = "0")]
        index: u64,
        /// Number of consecutive addresses
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// Security level 1-3 (default from config)
        #[arg(short, long)]
        security: Option<u8>,
        /// Sponge: kerl, curl-p27 or curl-p81 (default from config)
        #[arg(long)]
        sponge: Option<SpongeKind>,
        /// Print addresses without checksum
        #[arg(long)]
        no_checksum: bool,
    },
    /// Sign an 81-tryte bundle hash
    Sign {
        /// Seed trytes
        seed: String,
        /// Bundle hash (81 trytes)
        bundle: String,
        /// Key index
        #[arg(short, long, default_value = "0")]
        index: u64,
        /// Security level 1-3 (default from config)
        #[arg(short, long)]
        security: Option<u8>,
    },
    /// Verify signature fragments against an address
    Verify {
        /// Address (81 or 90 trytes)
        address: String,
        /// Bundle hash (81 trytes)
        bundle: String,
        /// Signature fragments (2187 trytes each), in order
        #[arg(required = true)]
        fragments: Vec<String>,
    },
    /// Address checksum operations
    Checksum {
        #[command(subcommand)]
        action: ChecksumAction,
    },
    /// Absorb trytes into a sponge and squeeze
    Hash {
        /// Input trytes (length must be a multiple of 81)
        trytes: String,
        /// Sponge: kerl, curl-p27 or curl-p81 (default from config)
        #[arg(long)]
        sponge: Option<SpongeKind>,
        /// Number of 81-tryte hashes to squeeze
        #[arg(short = 'n', long, default_value = "1")]
        squeezes: usize,
    },
    /// Print a co-signer's key digests as hex
    Digests {
        /// Seed trytes
        seed: String,
        /// Key index
        #[arg(short, long, default_value = "0")]
        index: u64,
        /// Security level 1-3 (default from config)
        #[arg(short, long)]
        security: Option<u8>,
    },
    /// Combine co-signer digests (hex, in signing order) into a multisig address
    Multisig {
        /// Hex digest sets, one per co-signer
        #[arg(required = true)]
        digests: Vec<String>,
    },
    /// Generate a random seed
    Seed,
    /// Run the built-in self-test
    Test,
}

#[derive(Subcommand)]
enum ChecksumAction {
    /// Append the checksum to an 81-tryte address
    Add { address: String },
    /// Print the checksum of an 81-tryte address
    Check { address: String },
    /// Check a 90-tryte address
    Verify { address: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&format!("Config error: {}", e)),
    };
    #[cfg(feature = "parallel")]
    if let Err(e) = config.install_thread_pool() {
        fail(&e.to_string());
    }

    let json = cli.json;
    match cli.command {
        Some(Commands::Address { seed, index, count, security, sponge, no_checksum }) => {
            let security = resolve_security(security, &config);
            let sponge = sponge.unwrap_or(config.sponge);
            let checksum = config.checksum && !no_checksum;
            derive_addresses(&seed, index, count, security, sponge, checksum, json);
        }
        Some(Commands::Sign { seed, bundle, index, security }) => {
            let security = resolve_security(security, &config);
            sign_bundle(&seed, &bundle, index, security, json);
        }
        Some(Commands::Verify { address, bundle, fragments }) => {
            verify_signature(&address, &bundle, &fragments, json);
        }
        Some(Commands::Checksum { action }) => {
            run_checksum(action, json);
        }
        Some(Commands::Hash { trytes, sponge, squeezes }) => {
            hash_trytes(&trytes, sponge.unwrap_or(config.sponge), squeezes, json);
        }
        Some(Commands::Digests { seed, index, security }) => {
            let security = resolve_security(security, &config);
            print_digests(&seed, index, security, json);
        }
        Some(Commands::Multisig { digests }) => {
            combine_multisig(&digests, json);
        }
        Some(Commands::Seed) => {
            let seed = Seed::random();
            if json {
                println!("{}", json!({ "seed": seed.as_str() }));
            } else {
                println!("{}", seed.as_str());
            }
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("trisign v0.1.0");
            println!("Balanced ternary one-time signatures");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_signing();
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("❌ {}", message);
    std::process::exit(1);
}

fn resolve_security(flag: Option<u8>, config: &Config) -> SecurityLevel {
    match flag {
        Some(level) => match SecurityLevel::try_from(level) {
            Ok(level) => level,
            Err(e) => fail(&e.to_string()),
        },
        None => config.security,
    }
}

fn parse_seed(seed: &str) -> Seed {
    match Seed::new(seed) {
        Ok(seed) => seed,
        Err(e) => fail(&format!("Invalid seed: {}", e)),
    }
}

fn derive_addresses(
    seed: &str,
    index: u64,
    count: usize,
    security: SecurityLevel,
    sponge: SpongeKind,
    with_checksum: bool,
    json: bool,
) {
    let seed = parse_seed(seed);

    let addresses = match signing::generate_addresses(&seed.to_trits(), index, count, security, sponge) {
        Ok(addresses) => addresses,
        Err(e) => fail(&format!("Address derivation failed: {}", e)),
    };

    let rendered: Vec<String> = if with_checksum {
        addresses
            .iter()
            .map(|a| checksum::add(a).unwrap_or_else(|e| fail(&e.to_string())))
            .collect()
    } else {
        addresses
    };

    if json {
        let entries: Vec<_> = rendered
            .iter()
            .enumerate()
            .map(|(i, a)| json!({ "index": index + i as u64, "address": a }))
            .collect();
        println!("{}", json!({ "security": security, "sponge": sponge, "addresses": entries }));
        return;
    }

    println!("🔑 {} address(es), security {}, {}", rendered.len(), security, sponge);
    for (i, address) in rendered.iter().enumerate() {
        println!("{:>6}: {}", index + i as u64, address);
    }
}

fn sign_bundle(seed: &str, bundle: &str, index: u64, security: SecurityLevel, json: bool) {
    let seed = parse_seed(seed);

    let signature = match Signature::sign(&seed, index, security, bundle) {
        Ok(signature) => signature,
        Err(e) => fail(&format!("Signing failed: {}", e)),
    };

    let normalized = signing::normalized_bundle(bundle).unwrap_or_else(|e| fail(&e.to_string()));
    let secure = signing::is_secure(&normalized[..security.fragments() * 27]);

    if json {
        println!("{}", json!({ "index": index, "secure": secure, "signature": signature }));
        return;
    }

    println!("✍️  Signed with key {} (security {})", index, security);
    if !secure {
        println!("⚠️  Bundle hash normalizes to a 13; part of the key is revealed unhashed.");
    }
    for (i, fragment) in signature.fragments().iter().enumerate() {
        println!();
        println!("━━━ Fragment {} ━━━", i);
        println!("{}", fragment);
    }
}

fn verify_signature(address: &str, bundle: &str, fragments: &[String], json: bool) {
    let valid = match signing::validate_signatures(address, fragments, bundle) {
        Ok(valid) => valid,
        Err(e) => fail(&format!("Verification error: {}", e)),
    };

    if json {
        println!("{}", json!({ "valid": valid }));
    } else if valid {
        println!("✓ Signature is valid");
    } else {
        println!("✗ Signature does not match the address");
    }

    if !valid {
        std::process::exit(2);
    }
}

fn run_checksum(action: ChecksumAction, json: bool) {
    match action {
        ChecksumAction::Add { address } => match checksum::add(&address) {
            Ok(full) if json => println!("{}", json!({ "address": full })),
            Ok(full) => println!("{}", full),
            Err(e) => fail(&e.to_string()),
        },
        ChecksumAction::Check { address } => match checksum::check(&address) {
            Ok(sum) if json => println!("{}", json!({ "checksum": sum })),
            Ok(sum) => println!("{}", sum),
            Err(e) => fail(&e.to_string()),
        },
        ChecksumAction::Verify { address } => {
            let valid = checksum::is_valid(&address);
            if json {
                println!("{}", json!({ "valid": valid }));
            } else if valid {
                println!("✓ Checksum is valid");
            } else {
                println!("✗ Checksum is invalid");
            }
            if !valid {
                std::process::exit(2);
            }
        }
    }
}

fn hash_trytes(trytes: &str, kind: SpongeKind, squeezes: usize, json: bool) {
    let trits = match trytes_to_trits(trytes) {
        Ok(trits) => trits,
        Err(e) => fail(&e.to_string()),
    };

    let mut sponge = kind.sponge();
    if let Err(e) = sponge.absorb(&trits) {
        fail(&e.to_string());
    }

    let squeezed = match sponge.squeeze_vec(squeezes * HASH_TRITS) {
        Ok(trits) => trits,
        Err(e) => fail(&e.to_string()),
    };
    let hashes: Vec<String> = squeezed
        .chunks_exact(HASH_TRITS)
        .map(|chunk| trits_to_trytes(chunk).unwrap_or_else(|e| fail(&e.to_string())))
        .collect();

    if json {
        println!("{}", json!({ "sponge": kind, "hashes": hashes }));
    } else {
        for hash in hashes {
            println!("{}", hash);
        }
    }
}

fn print_digests(seed: &str, index: u64, security: SecurityLevel, json: bool) {
    let seed = parse_seed(seed);
    let key = match seed.key(index, security) {
        Ok(key) => key,
        Err(e) => fail(&e.to_string()),
    };

    match Signing::<Kerl>::new().digests_bytes(&key) {
        Ok(bytes) if json => println!("{}", json!({ "index": index, "digests": hex::encode(bytes) })),
        Ok(bytes) => println!("{}", hex::encode(bytes)),
        Err(e) => fail(&e.to_string()),
    }
}

fn combine_multisig(digests: &[String], json: bool) {
    let mut msa = MultiSigningAddress::new();
    for (i, digest) in digests.iter().enumerate() {
        let bytes = match hex::decode(digest) {
            Ok(bytes) => bytes,
            Err(e) => fail(&format!("Digest set {} is not valid hex: {}", i, e)),
        };
        if let Err(e) = msa.absorb_digests(&bytes) {
            fail(&format!("Digest set {}: {}", i, e));
        }
    }

    let security = msa.security();
    let address = match msa.finalize() {
        Ok(address) => address.to_string(),
        Err(e) => fail(&e.to_string()),
    };
    let full = checksum::add(&address).unwrap_or_else(|e| fail(&e.to_string()));

    if json {
        println!("{}", json!({ "address": full, "security": security, "cosigners": digests.len() }));
    } else {
        println!("🤝 Multisig address from {} co-signer(s), security {}", digests.len(), security);
        println!("{}", full);
    }
}

fn demo_signing() {
    const DEMO_BUNDLE: &str =
        "RHBKYBCLYZCDQDUQPPJDFYPMNXPXDULWVEXOUDQFNTLHZRDHHAAYJLZOTUSBMTPIRATMJRCUWFOTUWGDA";

    println!("━━━ Ternary Signing Demo ━━━");
    println!();

    let seed = Seed::random();
    println!("Seed:    (random, 81 trytes)");

    let address = match seed.new_address(0, SecurityLevel::Low) {
        Ok(address) => address,
        Err(e) => fail(&e.to_string()),
    };
    let full = address.with_checksum().unwrap_or_else(|e| fail(&e.to_string()));
    println!("Address: {}", full);
    println!("Bundle:  {}", DEMO_BUNDLE);

    let signature = match Signature::sign(&seed, 0, SecurityLevel::Low, DEMO_BUNDLE) {
        Ok(signature) => signature,
        Err(e) => fail(&e.to_string()),
    };
    println!("Signed:  {} fragment(s) of 2187 trytes", signature.len());

    match signature.validate(&address, DEMO_BUNDLE) {
        Ok(true) => println!("✓ Signature verifies against the address"),
        Ok(false) => println!("✗ Signature failed to verify"),
        Err(e) => fail(&e.to_string()),
    }
}

fn run_self_test() {
    use trisign::ternary::{bytes_to_trits, trits_to_bytes};
    use trisign::Curl;

    const SEED: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQRSTUVWXYZABC";
    const BUNDLE: &str =
        "RHBKYBCLYZCDQDUQPPJDFYPMNXPXDULWVEXOUDQFNTLHZRDHHAAYJLZOTUSBMTPIRATMJRCUWFOTUWGDA";

    println!("━━━ trisign Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let mut report = |name: &str, ok: bool| {
        if ok {
            println!("{}... ✓", name);
            passed += 1;
        } else {
            println!("{}... ✗", name);
            failed += 1;
        }
    };

    // Test 1: Tryte conversion roundtrip
    let roundtrip = trytes_to_trits(SEED)
        .ok()
        .and_then(|t| trits_to_trytes(&t).ok())
        .map_or(false, |t| t == SEED);
    report("Tryte conversion roundtrip", roundtrip);

    // Test 2: Bigint bridge
    let bridge = trytes_to_trits(&format!("{}9", &SEED[..80]))
        .ok()
        .and_then(|t| trits_to_bytes(&t).ok().map(|b| (t, b)))
        .and_then(|(t, b)| bytes_to_trits(&b).ok().map(|back| back == t))
        .unwrap_or(false);
    report("Bigint bridge roundtrip", bridge);

    // Test 3: Kerl known answer
    let kerl = {
        let mut kerl = Kerl::new();
        trytes_to_trits(SEED)
            .ok()
            .and_then(|t| kerl.absorb(&t).ok())
            .and_then(|_| kerl.squeeze_hash().ok())
            .and_then(|h| trits_to_trytes(&h).ok())
            .map_or(false, |h| {
                h == "QEAIBNB9SWHRMEDYXEVL9AQRNHIJGNDGHRWJ9RYCIBLFDAKX9KDEQFLORHBGEMBCEKBTTXFFFJYXVXRPA"
            })
    };
    report("Kerl known answer", kerl);

    // Test 4: Curl known answer
    let curl = {
        let mut curl = Curl::new();
        trytes_to_trits(SEED)
            .ok()
            .and_then(|t| curl.absorb(&t).ok())
            .and_then(|_| curl.squeeze_hash().ok())
            .and_then(|h| trits_to_trytes(&h).ok())
            .map_or(false, |h| {
                h == "CHVGMHNSWUDXDJOXXSKMZJGKEDJOHMGMPLXAXTWMSSFJGHREVHJWSGVAURNVOONDVIGDN9PJQELSCBPDO"
            })
    };
    report("Curl-P-81 known answer", curl);

    // Test 5: Address known answer
    let address = Seed::new(SEED)
        .and_then(|s| s.new_address(0, SecurityLevel::Medium))
        .map_or(false, |a| {
            a.as_str() == "JFHYPLWCMIJDZKQS9TQQIFXVXGXITGPZGVGSSTZDESDHSQVTJABCNGVKOYNITDICSHLQXJMPPMWUSIYFB"
        });
    report("Address derivation (security 2)", address);

    // Test 6: Checksum known answer
    report(
        "Checksum of the null address",
        checksum::check(&"9".repeat(81)).map_or(false, |c| c == "A9BEONKZW"),
    );

    // Test 7: Sign and verify
    let signed = Seed::new(SEED).ok().and_then(|seed| {
        let address = Address::new(
            "JFHYPLWCMIJDZKQS9TQQIFXVXGXITGPZGVGSSTZDESDHSQVTJABCNGVKOYNITDICSHLQXJMPPMWUSIYFB",
        )
        .ok()?;
        let signature = Signature::sign(&seed, 0, SecurityLevel::Medium, BUNDLE).ok()?;
        signature.validate(&address, BUNDLE).ok()
    });
    report("Sign and verify", signed == Some(true));

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
