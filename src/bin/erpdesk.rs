use clap::Parser;
use erpdesk::console::{
  build_backend, render_context, run_create, run_dashboard, run_delete, run_init, run_list,
  run_update, Commands, ConsoleArgs, Repl,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let args = ConsoleArgs::parse();
  let config = args.load_config()?;

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let backend = build_backend(&config).await?;
  let ctx = render_context(&config, chrono::Local::now().date_naive());

  match &args.subcommand {
    Some(Commands::Init) => run_init(backend.as_ref()).await,
    Some(Commands::List {
      entity,
      search,
      sort,
      desc,
    }) => {
      run_list(
        backend,
        &ctx,
        *entity,
        search.as_deref(),
        sort.as_deref(),
        *desc,
      )
      .await
    }
    Some(Commands::Create { entity, json }) => run_create(backend, *entity, json).await,
    Some(Commands::Update { entity, id, json }) => run_update(backend, *entity, *id, json).await,
    Some(Commands::Delete { entity, id, yes }) => run_delete(backend, *entity, *id, *yes).await,
    Some(Commands::Dashboard) => run_dashboard(backend, &ctx).await,
    None => Repl::new(backend, ctx)?.run().await,
  }
}
