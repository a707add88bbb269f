use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use textgen_core::corpus;
use textgen_core::io::{get_filename, list_files};
use textgen_core::model::{Context, MarkovChain};
use textgen_core::text::compose;

/// Directory the server reads corpus files from.
const DATA_DIR: &str = "./data";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	start: Option<String>, // comma-separated custom seed of exactly N words
}

/// Struct representing query parameters for the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainParams {
	order: Option<usize>,
	names: Option<String>,
}

struct SharedData {
	chain: Option<MarkovChain>,
}

impl GenerateParams {
	/// Builds the custom seed context, if one was requested.
	///
	/// Words are given in reading order; the context stores them
	/// newest-first.
	fn start_context(&self, order: usize) -> Result<Option<Context>, String> {
		let Some(start) = &self.start else {
			return Ok(None);
		};

		let mut words: Vec<String> = start
			.split(',')
			.map(|word| word.trim().to_lowercase())
			.filter(|word| !word.is_empty())
			.collect();
		if words.len() != order {
			return Err(format!(
				"start seed must contain exactly {} words, got {}",
				order,
				words.len()
			));
		}
		words.reverse();
		Ok(Some(Context::new(words)))
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Samples a token sequence from the trained chain and returns it composed
/// as prose in the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(50);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let chain = match shared_data.chain.as_mut() {
		Some(chain) => chain,
		None => return HttpResponse::Conflict().body("No model trained yet"),
	};

	let start = match query.start_context(chain.order()) {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut generator = match chain.generator() {
		Ok(g) => g,
		Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
	};

	let seeded = match start {
		Some(context) => generator.seed_with(context).map(|_| ()),
		None => generator.seed().map(|_| ()),
	};
	if let Err(e) = seeded {
		return HttpResponse::InternalServerError().body(e.to_string());
	}

	match generator.generate(count) {
		Ok(tokens) => HttpResponse::Ok().body(compose(tokens)),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpus files available for training, one stem per line.
#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	let files = match list_files(DATA_DIR, &["txt", "md"]) {
		Ok(files) => files,
		Err(_) => return HttpResponse::InternalServerError().body("Failed to list corpora"),
	};
	let stems: Vec<String> = files
		.iter()
		.filter_map(|path| get_filename(path).ok())
		.collect();
	HttpResponse::Ok().body(stems.join("\n"))
}

/// HTTP GET endpoint `/v1/model`
///
/// Reports the live model: order, number of trained contexts, finalized
/// flag.
#[get("/v1/model")]
async fn get_model(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match &shared_data.chain {
		Some(chain) => HttpResponse::Ok().body(format!(
			"order: {}\ncontexts: {}\nfinalized: {}",
			chain.order(),
			chain.counts().len(),
			chain.is_finalized()
		)),
		None => HttpResponse::Ok().body("no model"),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Trains a fresh chain from the named corpus files, finalizes it and
/// installs it as the live model.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainParams>) -> impl Responder {
	let order = query.order.unwrap_or(2);

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	let names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let available = match list_files(DATA_DIR, &["txt", "md"]) {
		Ok(files) => files,
		Err(_) => return HttpResponse::InternalServerError().body("Failed to list corpora"),
	};

	let mut paths = Vec::new();
	for name in names {
		let found = available
			.iter()
			.find(|path| get_filename(path).is_ok_and(|stem| stem == name));
		match found {
			Some(path) => paths.push(path.clone()),
			None => return HttpResponse::BadRequest().body(format!("Unknown corpus: {}", name)),
		}
	}

	let mut chain = match MarkovChain::new(order) {
		Ok(chain) => chain,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};
	if let Err(e) = corpus::train_files(&mut chain, &paths) {
		return HttpResponse::InternalServerError().body(format!("Failed to train: {e}"));
	}
	if let Err(e) = chain.finalize() {
		return HttpResponse::InternalServerError().body(e.to_string());
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.chain = Some(chain);

	HttpResponse::Ok().body("Model trained successfully")
}

/// Main entry point for the server.
///
/// Starts with no model loaded; `/v1/train` installs one. The chain lives
/// behind a `Mutex` because generation forks the chain's random source.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The corpus directory is hardcoded and should be made configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let shared_data = SharedData { chain: None };
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_model)
			.service(put_train)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
