use notated::{
  Axis, Catalog, CatalogConfig, Dimensions, Error, Expression, LabeledArray,
};
use serde_json::{Map, Value};

fn catalog() -> Catalog {
  Catalog::with_config(&CatalogConfig {
    dimensions: Dimensions::small(),
    seed: 2017,
  })
  .unwrap()
}

mod lookup {
  use super::*;

  #[test]
  fn lookup_wraps_entry() {
    let catalog = catalog();
    let t = catalog.get("temperature").unwrap();
    assert!(t.is_realized());
    assert_eq!(t.symbol(), Some("T"));
    assert_eq!(t.notation(), "T_{bins,region,time}");
    assert_eq!(t.axes().unwrap(), vec!["bins", "region", "time"]);
    assert_eq!(
      catalog.entry("temperature").unwrap().description(),
      Some("NASA downscaled climate data")
    );
  }

  #[test]
  fn symbols() {
    let catalog = catalog();
    let notation = |name| catalog.get(name).unwrap().notation().to_string();
    assert_eq!(notation("alpha"), r"\alpha_{bins}");
    assert_eq!(notation("gamma1"), r"{\gamma_1}_{bins}");
    assert_eq!(notation("gamma2"), r"{\gamma_2}_{bins}");
    assert_eq!(notation("gamma3"), r"{\gamma_3}_{bins}");
    assert_eq!(
      notation("avgDaysPerBin"),
      "AvgDaysPerBin_{bins,region,time}"
    );
    assert_eq!(notation("gdpPerCapita"), "GdpPC_{region,time}");
    assert_eq!(notation("populationDensity"), "PopDensity_{region,time}");
  }

  #[test]
  fn names_are_sorted() {
    let catalog = catalog();
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(
      names,
      vec![
        "alpha",
        "avgDaysPerBin",
        "gamma1",
        "gamma2",
        "gamma3",
        "gdpPerCapita",
        "populationDensity",
        "temperature",
      ]
    );
  }

  #[test]
  fn unknown_variable() {
    assert_eq!(
      catalog().get("doesNotExist"),
      Err(Error::UnknownVariable("doesNotExist".to_string()))
    );
  }

  #[test]
  fn custom_entries() {
    let rainfall = LabeledArray::from_vec(
      vec![Axis::new("region", 2)],
      vec![3.0, 5.0],
    )
    .unwrap()
    .with_symbol("R");
    let catalog = Catalog::from_entries([("rainfall".to_string(), rainfall)]);
    assert_eq!(catalog.len(), 1);
    let r = catalog.get("rainfall").unwrap();
    assert_eq!(r.notation(), "R_{region}");
    let total = r.sum(None).force().unwrap();
    assert_eq!(total.payload().unwrap().as_scalar(), Some(8.0));
    assert!(matches!(
      catalog.get("temperature"),
      Err(Error::UnknownVariable(_))
    ));
  }

  #[test]
  fn lookups_are_independent() {
    let catalog = catalog();
    let mut first = catalog.get("alpha").unwrap();
    first.set_symbol("a").unwrap();
    first.set_notation("a").unwrap();
    let second = catalog.get("alpha").unwrap();
    assert_eq!(second.symbol(), Some(r"\alpha"));
    assert_eq!(second.notation(), r"\alpha_{bins}");
    assert_eq!(catalog.entry("alpha").unwrap().symbol(), Some(r"\alpha"));
  }

  #[test]
  fn reconfigure_is_acknowledged() {
    let mut catalog = catalog();
    let before = catalog.get("gdpPerCapita").unwrap();
    let mut options = Map::new();
    options.insert("source".to_string(), Value::from("csvv"));
    catalog.reconfigure(options);
    assert_eq!(catalog.options().len(), 1);
    assert_eq!(catalog.get("gdpPerCapita").unwrap(), before);
  }

  #[test]
  fn shared_between_threads() {
    let catalog = catalog();
    let totals: Vec<f64> = std::thread::scope(|scope| {
      let handles: Vec<_> = ["alpha", "gamma1"]
        .into_iter()
        .map(|name| {
          let catalog = &catalog;
          scope.spawn(move || {
            let total = catalog.get(name).unwrap().sum(None).force().unwrap();
            total.payload().unwrap().as_scalar().unwrap()
          })
        })
        .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(totals.len(), 2);
    assert!(totals.iter().all(|total| *total > 0.0));
  }
}

mod mortality {
  use super::*;

  const BETAHAT: &str = concat!(
    r"\alpha_{bins}",
    r" + \left({\gamma_1}_{bins}\right)\left(AvgDaysPerBin_{bins,region,time}\right)",
    r" + \left({\gamma_2}_{bins}\right)\left(\ln{\left(GdpPC_{region,time}\right)}\right)",
    r" + \left({\gamma_3}_{bins}\right)\left(\ln{\left(PopDensity_{region,time}\right)}\right)",
  );

  fn betahat(catalog: &Catalog) -> Expression {
    let alpha = catalog.get("alpha").unwrap();
    let gamma1 = catalog.get("gamma1").unwrap();
    let gamma2 = catalog.get("gamma2").unwrap();
    let gamma3 = catalog.get("gamma3").unwrap();
    let days = catalog.get("avgDaysPerBin").unwrap();
    let gdp = catalog.get("gdpPerCapita").unwrap();
    let density = catalog.get("populationDensity").unwrap();
    &alpha + &gamma1 * &days + &gamma2 * gdp.ln() + &gamma3 * density.ln()
  }

  #[test]
  fn betahat_notation_and_axes() {
    let catalog = catalog();
    let betahat = betahat(&catalog);
    assert_eq!(betahat.notation(), BETAHAT);
    let betahat = betahat.force().unwrap();
    assert_eq!(betahat.axes().unwrap(), vec!["bins", "region", "time"]);
    assert_eq!(betahat.payload().unwrap().shape(), vec![12, 4, 3]);
  }

  #[test]
  fn mortality_sums_out_bins() {
    let catalog = catalog();
    let mut betahat = betahat(&catalog).force().unwrap();
    betahat.set_symbol(r"\hat{\beta}").unwrap();
    assert_eq!(
      betahat.equation().unwrap(),
      format!(r"\hat{{\beta}}_{{bins,region,time}} = {BETAHAT}")
    );
    betahat.set_notation(r"\hat{\beta}").unwrap();

    let temperature = catalog.get("temperature").unwrap();
    let mortality = (&betahat * &temperature).sum(Some("bins"));
    assert_eq!(
      mortality.notation(),
      r"\sum_{bins}{\left\{\left(\hat{\beta}_{bins,region,time}\right)\left(T_{bins,region,time}\right)\right\}}"
    );

    let mut mortality = mortality.force().unwrap();
    assert_eq!(mortality.axes().unwrap(), vec!["region", "time"]);
    mortality.set_symbol("M").unwrap();
    assert_eq!(mortality.canonical_symbol().unwrap(), "M_{region,time}");
  }

  #[test]
  fn mortality_values() {
    let catalog = catalog();
    let temperature = catalog.get("temperature").unwrap();
    let mortality = (betahat(&catalog) * &temperature)
      .sum(Some("bins"))
      .force()
      .unwrap();
    let mortality = mortality.payload().unwrap();

    let entry = |name| catalog.entry(name).unwrap();
    let (alpha, gamma1, gamma2, gamma3) = (
      entry("alpha"),
      entry("gamma1"),
      entry("gamma2"),
      entry("gamma3"),
    );
    let (days, gdp, density, t) = (
      entry("avgDaysPerBin"),
      entry("gdpPerCapita"),
      entry("populationDensity"),
      entry("temperature"),
    );
    let dims = Dimensions::small();
    for region in 0..dims.regions {
      for time in 0..dims.years {
        let expected: f64 = (0..dims.bins)
          .map(|bin| {
            let b = |array: &notated::LabeledArray| array.get(&[bin]).unwrap();
            let brt = |array: &notated::LabeledArray| {
              array.get(&[bin, region, time]).unwrap()
            };
            let rt = |array: &notated::LabeledArray| {
              array.get(&[region, time]).unwrap()
            };
            let betahat = b(alpha)
              + b(gamma1) * brt(days)
              + b(gamma2) * rt(gdp).ln()
              + b(gamma3) * rt(density).ln();
            betahat * brt(t)
          })
          .sum();
        let actual = mortality.get(&[region, time]).unwrap();
        assert!(
          (actual - expected).abs() < 1e-9,
          "region {region}, time {time}: {actual} != {expected}"
        );
      }
    }
  }

  #[test]
  fn building_does_not_touch_values() {
    // Nothing here inspects array contents, so a bad axis goes unnoticed
    // until the expression is forced.
    let catalog = catalog();
    let e = betahat(&catalog).sum(Some("bin"));
    assert_eq!(e.pending_operations().len(), 4);
    assert!(matches!(e.force(), Err(Error::InvalidAxis { .. })));
  }
}
